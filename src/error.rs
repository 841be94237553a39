pub type Result<T> = core::result::Result<T, Error>;

pub struct Error {
    pub inner: Box<ErrorKind>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Error {
        Error {
            inner: Box::new(kind),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.inner
    }

    /// A duplicate click while the same action is still pending.
    pub fn is_in_flight(&self) -> bool {
        matches!(*self.inner, ErrorKind::InFlight(_))
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self.inner)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error::new(kind)
    }
}

#[cfg(feature = "no-wasm")]
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::new(ErrorKind::ReqwestError(e))
    }
}

#[cfg(feature = "wasm")]
impl From<gloo_net::Error> for Error {
    fn from(e: gloo_net::Error) -> Error {
        Error::new(ErrorKind::GlooNetError(e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::new(ErrorKind::SerdeJsonError(e))
    }
}

pub enum ErrorKind {
    #[cfg(feature = "no-wasm")]
    ReqwestError(reqwest::Error),
    #[cfg(feature = "wasm")]
    GlooNetError(gloo_net::Error),
    SerdeJsonError(serde_json::Error),
    HttpStatus(u16),
    UnexpectedStatus(String),
    MissingCsrfToken(String),
    InFlight(String),
    ParseError(String),
}

impl std::fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            #[cfg(feature = "no-wasm")]
            ErrorKind::ReqwestError(ref e) => write!(f, "ReqwestError: {e:?}"),
            #[cfg(feature = "wasm")]
            ErrorKind::GlooNetError(ref e) => write!(f, "GlooNetError: {e:?}"),
            ErrorKind::SerdeJsonError(ref e) => write!(f, "SerdeJsonError: {e:?}"),
            ErrorKind::HttpStatus(code) => write!(f, "HttpStatus: {code}"),
            ErrorKind::UnexpectedStatus(ref e) => write!(f, "UnexpectedStatus: {e:?}"),
            ErrorKind::MissingCsrfToken(ref e) => write!(f, "MissingCsrfToken: {e:?}"),
            ErrorKind::InFlight(ref e) => write!(f, "InFlight: {e:?}"),
            ErrorKind::ParseError(ref e) => write!(f, "ParseError: {e:?}"),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            #[cfg(feature = "no-wasm")]
            ErrorKind::ReqwestError(ref e) => write!(f, "request failed: {e}"),
            #[cfg(feature = "wasm")]
            ErrorKind::GlooNetError(ref e) => write!(f, "request failed: {e}"),
            ErrorKind::SerdeJsonError(ref e) => write!(f, "invalid JSON response: {e}"),
            ErrorKind::HttpStatus(code) => write!(f, "server answered with HTTP {code}"),
            ErrorKind::UnexpectedStatus(ref e) => write!(f, "server reported status {e:?}"),
            ErrorKind::MissingCsrfToken(ref e) => write!(f, "no {e} cookie present"),
            ErrorKind::InFlight(ref e) => write!(f, "{e} is already in flight"),
            ErrorKind::ParseError(ref e) => write!(f, "parse error: {e}"),
        }
    }
}
