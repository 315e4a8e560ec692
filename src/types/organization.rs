use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OrgId, UserId};

/// Billing plan of an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum Plan {
    #[default]
    Free,
    Pro,
    Enterprise,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "Free",
            Plan::Pro => "Pro",
            Plan::Enterprise => "Enterprise",
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Currencies an organization can report in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
    Inr,
    Cad,
    Aud,
}

impl CurrencyCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Jpy => "JPY",
            CurrencyCode::Inr => "INR",
            CurrencyCode::Cad => "CAD",
            CurrencyCode::Aud => "AUD",
        }
    }

    /// Display symbol, as an en-US locale would render it.
    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "$",
            CurrencyCode::Eur => "€",
            CurrencyCode::Gbp => "£",
            CurrencyCode::Jpy => "¥",
            CurrencyCode::Inr => "₹",
            CurrencyCode::Cad => "CA$",
            CurrencyCode::Aud => "A$",
        }
    }

    /// Number of minor-unit digits shown when formatting.
    pub fn fraction_digits(&self) -> u32 {
        match self {
            CurrencyCode::Jpy => 0,
            _ => 2,
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(CurrencyCode::Usd),
            "EUR" => Ok(CurrencyCode::Eur),
            "GBP" => Ok(CurrencyCode::Gbp),
            "JPY" => Ok(CurrencyCode::Jpy),
            "INR" => Ok(CurrencyCode::Inr),
            "CAD" => Ok(CurrencyCode::Cad),
            "AUD" => Ok(CurrencyCode::Aud),
            _ => Err(format!("unknown currency: {}", s)),
        }
    }
}

/// An organization (tenant).
///
/// Expenses, budgets, notifications, members and billing records are all
/// owned by exactly one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: OrgId,
    pub name: String,
    pub slug: String,
    pub plan: Plan,
    pub currency: CurrencyCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_email: Option<String>,
    /// Unique category names, in display order.
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Organization {
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    /// Append a category unless it is already present.
    ///
    /// Returns `true` if the set changed.
    pub fn add_category(&mut self, name: &str) -> bool {
        if self.has_category(name) {
            return false;
        }
        self.categories.push(name.to_string());
        true
    }

    /// Remove a category if present.
    ///
    /// Returns `true` if the set changed.
    pub fn remove_category(&mut self, name: &str) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c != name);
        self.categories.len() != before
    }

    /// Apply a settings patch in place.
    pub fn apply(&mut self, update: &OrganizationUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(slug) = &update.slug {
            self.slug = slug.clone();
        }
        if let Some(plan) = update.plan {
            self.plan = plan;
        }
        if let Some(currency) = update.currency {
            self.currency = currency;
        }
        if let Some(logo) = &update.logo {
            self.logo = Some(logo.clone());
        }
        if let Some(email) = &update.billing_email {
            self.billing_email = Some(email.clone());
        }
    }
}

/// Partial update of organization settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_email: Option<String>,
}

impl OrganizationUpdate {
    pub fn plan(plan: Plan) -> Self {
        Self {
            plan: Some(plan),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), super::ValidationError> {
        if let Some(name) = &self.name {
            super::require("name", name)?;
        }
        if let Some(slug) = &self.slug {
            super::validate_slug("slug", slug)?;
        }
        if let Some(email) = &self.billing_email {
            super::validate_email("billingEmail", email)?;
        }
        Ok(())
    }
}

/// Role of a member within one organization.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OrgRole {
    Admin,
    #[default]
    Member,
    Viewer,
}

impl OrgRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrgRole::Admin => "admin",
            OrgRole::Member => "member",
            OrgRole::Viewer => "viewer",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, OrgRole::Admin)
    }
}

impl std::fmt::Display for OrgRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrgRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(OrgRole::Admin),
            "member" => Ok(OrgRole::Member),
            "viewer" => Ok(OrgRole::Viewer),
            _ => Err(format!("unknown role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    #[default]
    Active,
    Invited,
}

/// A roster entry: one per user per organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgMember {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: OrgRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub status: MemberStatus,
    pub joined_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org() -> Organization {
        Organization {
            id: "org1".to_string(),
            name: "Acme Corp".to_string(),
            slug: "acme".to_string(),
            plan: Plan::Pro,
            currency: CurrencyCode::Usd,
            logo: None,
            billing_email: Some("billing@acme.com".to_string()),
            categories: vec!["Software".to_string(), "Travel".to_string()],
        }
    }

    #[test]
    fn test_add_category_is_idempotent() {
        let mut org = org();
        assert!(org.add_category("Marketing"));
        assert!(!org.add_category("Marketing"));
        assert_eq!(org.categories, vec!["Software", "Travel", "Marketing"]);
    }

    #[test]
    fn test_remove_missing_category_is_noop() {
        let mut org = org();
        assert!(!org.remove_category("Hosting"));
        assert_eq!(org.categories, vec!["Software", "Travel"]);

        assert!(org.remove_category("Software"));
        assert_eq!(org.categories, vec!["Travel"]);
    }

    #[test]
    fn test_apply_update() {
        let mut org = org();
        org.apply(&OrganizationUpdate {
            name: Some("Acme Inc".to_string()),
            currency: Some(CurrencyCode::Eur),
            ..Default::default()
        });
        assert_eq!(org.name, "Acme Inc");
        assert_eq!(org.currency, CurrencyCode::Eur);
        assert_eq!(org.slug, "acme");
        assert_eq!(org.plan, Plan::Pro);
    }

    #[test]
    fn test_update_validation() {
        assert!(OrganizationUpdate::plan(Plan::Enterprise).validate().is_ok());

        let bad_email = OrganizationUpdate {
            billing_email: Some("billing".to_string()),
            ..Default::default()
        };
        assert!(bad_email.validate().is_err());

        let blank_name = OrganizationUpdate {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("admin".parse::<OrgRole>().unwrap(), OrgRole::Admin);
        assert_eq!("Viewer".parse::<OrgRole>().unwrap(), OrgRole::Viewer);
        assert!("owner".parse::<OrgRole>().is_err());
    }

    #[test]
    fn test_currency_serde() {
        let json = serde_json::to_string(&CurrencyCode::Eur).unwrap();
        assert_eq!(json, "\"EUR\"");
        assert_eq!("jpy".parse::<CurrencyCode>().unwrap(), CurrencyCode::Jpy);
        assert_eq!(CurrencyCode::Jpy.fraction_digits(), 0);
    }

    #[test]
    fn test_organization_wire_format() {
        let json = serde_json::to_value(org()).unwrap();
        assert_eq!(json["billingEmail"], "billing@acme.com");
        assert_eq!(json["plan"], "Pro");
        assert_eq!(json["currency"], "USD");
        assert!(json.get("logo").is_none());
    }
}
