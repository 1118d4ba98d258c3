use crate::sbom_generation::domain::LicenseInfo;

/// Placeholder URL nuget.org publishes in `licenseUrl` when a package only has an expression
const DEPRECATED_LICENSE_URL: &str = "https://aka.ms/deprecateLicenseUrl";

/// License URLs of this form carry the SPDX expression in their path
const NUGET_LICENSE_URL_PREFIX: &str = "https://licenses.nuget.org/";

/// LicensePriority policy for determining license information precedence
///
/// This policy encodes the business rules for selecting license information
/// when a registry entry carries several license fields.
///
/// Priority order:
/// 1. licenseExpression (if non-empty)
/// 2. licenseUrl pointing at licenses.nuget.org (expression recovered from the path)
/// 3. any other licenseUrl, except the deprecation placeholder
pub struct LicensePriority;

impl LicensePriority {
    /// Selects the most appropriate license declaration
    ///
    /// # Arguments
    /// * `license_expression` - `licenseExpression` from the registration catalog entry
    /// * `license_url` - `licenseUrl` from the registration catalog entry
    ///
    /// # Returns
    /// The selected license, or None if no usable license field was present
    pub fn select_license(
        license_expression: Option<&str>,
        license_url: Option<&str>,
    ) -> Option<LicenseInfo> {
        license_expression
            .map(str::trim)
            .filter(|expr| !expr.is_empty())
            .map(Self::from_expression)
            .or_else(|| license_url.and_then(Self::from_url))
    }

    /// Whether a license URL is worth resolving further (e.g. through GitHub)
    pub fn is_meaningful_url(url: &str) -> bool {
        let url = url.trim();
        !url.is_empty() && !url.eq_ignore_ascii_case(DEPRECATED_LICENSE_URL)
    }

    /// Single identifiers become an SPDX id; compound expressions stay expressions
    fn from_expression(expression: &str) -> LicenseInfo {
        let is_single_id = !expression.contains(char::is_whitespace)
            && !expression.contains('(')
            && !expression.contains(')');
        if is_single_id {
            LicenseInfo::SpdxId(expression.to_string())
        } else {
            LicenseInfo::Expression(expression.to_string())
        }
    }

    fn from_url(url: &str) -> Option<LicenseInfo> {
        let url = url.trim();
        if !Self::is_meaningful_url(url) {
            return None;
        }

        if let Some(path) = url.strip_prefix(NUGET_LICENSE_URL_PREFIX) {
            let expression = urlencoding::decode(path.trim_end_matches('/'))
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| path.to_string());
            if !expression.is_empty() {
                return Some(Self::from_expression(&expression));
            }
        }

        Some(LicenseInfo::Url(url.to_string()))
    }
}
