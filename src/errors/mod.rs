pub mod store;

pub use store::StoreError;

/// Symbolic error kinds exposed to API consumers.
///
/// Numeric codes follow the `aabbccc` scheme: `aa` identifies the service or
/// component (10 reserved for general errors), `bb` the error category
/// (99 general, 00 bad request, 01 unauthorized, 03 forbidden, 04 not found,
/// 09 conflict) and `ccc` the detailed cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Unknown,
    RequestParse,
    Database,
    FeatureUnavailable,
    IncompleteInput,
}

impl ErrorCode {
    pub const fn code(self) -> u32 {
        match self {
            ErrorCode::Unknown => 1_099_001,
            ErrorCode::RequestParse => 1_099_002,
            ErrorCode::Database => 1_099_003,
            ErrorCode::FeatureUnavailable => 1_099_004,
            ErrorCode::IncompleteInput => 1_099_005,
        }
    }

    pub const fn explanation(self) -> &'static str {
        match self {
            ErrorCode::Unknown => "Unknown error occured. Contact the technical support.",
            ErrorCode::RequestParse => {
                "Failed to parse request body. Make sure your request conform with api documentation."
            }
            ErrorCode::Database => "Error occured during read/write database",
            ErrorCode::FeatureUnavailable => "Feature not available yet",
            ErrorCode::IncompleteInput => {
                "At least one mandatory input not provided. Check API documentation!"
            }
        }
    }
}
