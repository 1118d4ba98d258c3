/// LicenseInfo value object representing one license declaration
///
/// Exactly one of the variants is populated by the license priority policy:
/// an SPDX expression, an SPDX id, or a bare URL when nothing better is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseInfo {
    Expression(String),
    SpdxId(String),
    Url(String),
}

impl LicenseInfo {
    pub fn expression(&self) -> Option<&str> {
        match self {
            LicenseInfo::Expression(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn spdx_id(&self) -> Option<&str> {
        match self {
            LicenseInfo::SpdxId(id) => Some(id),
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            LicenseInfo::Url(url) => Some(url),
            _ => None,
        }
    }
}
