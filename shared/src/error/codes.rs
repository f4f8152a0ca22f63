//! Unified error codes for the admin backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Quotation errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Product / catalog errors
//! - 7xxx: File storage errors
//! - 8xxx: User / role errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists (unique constraint)
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Target role ranks at or above the actor's role
    HierarchyViolation = 2002,
    /// Special permission assigned to a non-special role
    SpecialPermissionRequired = 2003,
    /// Unknown or malformed permission token
    InvalidPermission = 2004,

    // ==================== 3xxx: Quotation ====================
    /// Quotation not found
    QuotationNotFound = 3001,
    /// Quotation was already turned into an order
    QuotationAlreadyOrdered = 3002,
    /// Quotation has no items
    QuotationEmpty = 3003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been paid
    OrderAlreadyPaid = 4002,
    /// Order was cancelled
    OrderCancelled = 4004,
    /// Order is empty
    OrderEmpty = 4007,

    // ==================== 5xxx: Payment ====================
    /// Payment processing failed (declined)
    PaymentFailed = 5001,
    /// Payment gateway unreachable or returned an unexpected answer
    PaymentGatewayError = 5006,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category has products
    CategoryHasProducts = 6102,
    /// Producer not found
    ProducerNotFound = 6151,
    /// Producer has products
    ProducerHasProducts = 6152,
    /// Unknown approval tag
    InvalidApprovalTag = 6201,

    // ==================== 7xxx: File storage ====================
    /// File too large
    FileTooLarge = 7001,
    /// Unsupported file format
    UnsupportedFileFormat = 7002,
    /// Invalid/corrupted image file
    InvalidImageFile = 7003,
    /// No file provided in request
    NoFileProvided = 7004,
    /// Empty file provided
    EmptyFile = 7005,
    /// Image processing failed
    ImageProcessingFailed = 7008,
    /// Object storage write/delete failed
    FileStorageFailed = 7009,

    // ==================== 8xxx: User / Role ====================
    /// User not found
    UserNotFound = 8001,
    /// User email already registered
    UserEmailExists = 8002,
    /// Cannot delete yourself
    UserCannotDeleteSelf = 8003,
    /// Role not found
    RoleNotFound = 8101,
    /// Role name already exists
    RoleNameExists = 8102,
    /// Role is still assigned to users
    RoleInUse = 8103,
    /// Discount outside [0, 10000] basis points
    RoleInvalidDiscount = 8105,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Timeout error
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            Self::Success => "Operation completed successfully",
            Self::Unknown => "An unknown error occurred",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::ValueOutOfRange => "Value is out of range",

            // Auth
            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid email or password",
            Self::TokenExpired => "Token has expired",
            Self::TokenInvalid => "Invalid token",
            Self::AccountDisabled => "Account is disabled",

            // Permission
            Self::PermissionDenied => "Permission denied",
            Self::HierarchyViolation => "Target role ranks at or above your own",
            Self::SpecialPermissionRequired => "Special permissions require a special role",
            Self::InvalidPermission => "Invalid permission",

            // Quotation
            Self::QuotationNotFound => "Quotation not found",
            Self::QuotationAlreadyOrdered => "Quotation has already been ordered",
            Self::QuotationEmpty => "Quotation has no items",

            // Order
            Self::OrderNotFound => "Order not found",
            Self::OrderAlreadyPaid => "Order has already been paid",
            Self::OrderCancelled => "Order has been cancelled",
            Self::OrderEmpty => "Order is empty",

            // Payment
            Self::PaymentFailed => "Payment failed",
            Self::PaymentGatewayError => "Payment gateway error",

            // Product
            Self::ProductNotFound => "Product not found",
            Self::ProductInvalidPrice => "Product has invalid price",
            Self::CategoryNotFound => "Category not found",
            Self::CategoryHasProducts => "Category has products",
            Self::ProducerNotFound => "Producer not found",
            Self::ProducerHasProducts => "Producer has products",
            Self::InvalidApprovalTag => "Invalid approval tag",

            // File storage
            Self::FileTooLarge => "File is too large",
            Self::UnsupportedFileFormat => "Unsupported file format",
            Self::InvalidImageFile => "Invalid or corrupted image file",
            Self::NoFileProvided => "No file provided",
            Self::EmptyFile => "Empty file provided",
            Self::ImageProcessingFailed => "Image processing failed",
            Self::FileStorageFailed => "File storage failed",

            // User / Role
            Self::UserNotFound => "User not found",
            Self::UserEmailExists => "Email is already registered",
            Self::UserCannotDeleteSelf => "Cannot delete yourself",
            Self::RoleNotFound => "Role not found",
            Self::RoleNameExists => "Role name already exists",
            Self::RoleInUse => "Role is in use",
            Self::RoleInvalidDiscount => "Discount must be between 0 and 10000 basis points",

            // System
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::NetworkError => "Network error",
            Self::TimeoutError => "Operation timed out",
            Self::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when converting an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::HierarchyViolation),
            2003 => Ok(ErrorCode::SpecialPermissionRequired),
            2004 => Ok(ErrorCode::InvalidPermission),

            // Quotation
            3001 => Ok(ErrorCode::QuotationNotFound),
            3002 => Ok(ErrorCode::QuotationAlreadyOrdered),
            3003 => Ok(ErrorCode::QuotationEmpty),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyPaid),
            4004 => Ok(ErrorCode::OrderCancelled),
            4007 => Ok(ErrorCode::OrderEmpty),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5006 => Ok(ErrorCode::PaymentGatewayError),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6102 => Ok(ErrorCode::CategoryHasProducts),
            6151 => Ok(ErrorCode::ProducerNotFound),
            6152 => Ok(ErrorCode::ProducerHasProducts),
            6201 => Ok(ErrorCode::InvalidApprovalTag),

            // File storage
            7001 => Ok(ErrorCode::FileTooLarge),
            7002 => Ok(ErrorCode::UnsupportedFileFormat),
            7003 => Ok(ErrorCode::InvalidImageFile),
            7004 => Ok(ErrorCode::NoFileProvided),
            7005 => Ok(ErrorCode::EmptyFile),
            7008 => Ok(ErrorCode::ImageProcessingFailed),
            7009 => Ok(ErrorCode::FileStorageFailed),

            // User / Role
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::UserEmailExists),
            8003 => Ok(ErrorCode::UserCannotDeleteSelf),
            8101 => Ok(ErrorCode::RoleNotFound),
            8102 => Ok(ErrorCode::RoleNameExists),
            8103 => Ok(ErrorCode::RoleInUse),
            8105 => Ok(ErrorCode::RoleInvalidDiscount),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::AlreadyExists.code(), 4);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::QuotationNotFound.code(), 3001);
        assert_eq!(ErrorCode::OrderAlreadyPaid.code(), 4002);
        assert_eq!(ErrorCode::PaymentFailed.code(), 5001);
        assert_eq!(ErrorCode::ProductNotFound.code(), 6001);
        assert_eq!(ErrorCode::FileTooLarge.code(), 7001);
        assert_eq!(ErrorCode::RoleNotFound.code(), 8101);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(2002), Ok(ErrorCode::HierarchyViolation));
        assert_eq!(ErrorCode::try_from(8105), Ok(ErrorCode::RoleInvalidDiscount));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(9999), Err(InvalidErrorCode(9999)));
        assert_eq!(ErrorCode::try_from(7), Err(InvalidErrorCode(7)));
        assert_eq!(ErrorCode::try_from(6003), Err(InvalidErrorCode(6003)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::RoleInUse).unwrap();
        assert_eq!(json, "8103");
        let code: ErrorCode = serde_json::from_str("6201").unwrap();
        assert_eq!(code, ErrorCode::InvalidApprovalTag);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("12345");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::OrderNotFound), "4001");
    }
}
