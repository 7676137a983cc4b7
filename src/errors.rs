use std::fmt;

#[derive(Debug, Clone)]
pub enum DynalogError {
    EndpointClaim(String),
    Connection(String),
    Timeout(String),
    Protocol(String),
    LogConfig(String),
    Io(String),
}

impl DynalogError {
    pub fn code(&self) -> &'static str {
        match self {
            DynalogError::EndpointClaim(_) => "E001",
            DynalogError::Connection(_) => "E002",
            DynalogError::Timeout(_) => "E003",
            DynalogError::Protocol(_) => "E004",
            DynalogError::LogConfig(_) => "E005",
            DynalogError::Io(_) => "E006",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            DynalogError::EndpointClaim(_) => "Endpoint Claim Error",
            DynalogError::Connection(_) => "Connection Error",
            DynalogError::Timeout(_) => "Timeout",
            DynalogError::Protocol(_) => "Protocol Error",
            DynalogError::LogConfig(_) => "Log Configuration Error",
            DynalogError::Io(_) => "IO Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DynalogError::EndpointClaim(msg) => msg,
            DynalogError::Connection(msg) => msg,
            DynalogError::Timeout(msg) => msg,
            DynalogError::Protocol(msg) => msg,
            DynalogError::LogConfig(msg) => msg,
            DynalogError::Io(msg) => msg,
        }
    }
}

impl fmt::Display for DynalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for DynalogError {}

// 便捷的构造函数
impl DynalogError {
    pub fn endpoint_claim<T: Into<String>>(msg: T) -> Self {
        DynalogError::EndpointClaim(msg.into())
    }

    pub fn connection<T: Into<String>>(msg: T) -> Self {
        DynalogError::Connection(msg.into())
    }

    pub fn timeout<T: Into<String>>(msg: T) -> Self {
        DynalogError::Timeout(msg.into())
    }

    pub fn protocol<T: Into<String>>(msg: T) -> Self {
        DynalogError::Protocol(msg.into())
    }

    pub fn log_config<T: Into<String>>(msg: T) -> Self {
        DynalogError::LogConfig(msg.into())
    }
}

impl From<std::io::Error> for DynalogError {
    fn from(err: std::io::Error) -> Self {
        DynalogError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DynalogError>;
