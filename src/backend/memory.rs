//! In-memory data service with artificial latency.
//!
//! Data is keyed by organization id and seeded with two demo organizations
//! (Acme Corp and Blueberry Labs). Nothing is persisted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::{BackendError, BackendResult, DataService};
use crate::types::{
    AppNotification, Budget, BudgetId, BudgetPeriod, BudgetUpdate, CardBrand, CurrencyCode,
    Expense, ExpenseId, ExpenseStatus, ExpenseUpdate, Invoice, InvoiceStatus, LoginResponse,
    MemberStatus, NewBudget, NewExpense, NotificationId, NotificationKind, OrgId, OrgMember,
    OrgRole, Organization, OrganizationUpdate, PaymentMethod, Plan, UserId, UserProfile,
    UserUpdate,
};

/// Email that always logs in as the seeded user.
pub const DEMO_EMAIL: &str = "demo@expenseflow.com";

/// Categories every new organization starts with.
const DEFAULT_CATEGORIES: &[&str] = &["Software", "Travel", "Office Supplies"];

#[derive(Debug, Default)]
struct MockDb {
    user: Option<UserProfile>,
    organizations: Vec<Organization>,
    members: HashMap<OrgId, Vec<OrgMember>>,
    expenses: HashMap<OrgId, Vec<Expense>>,
    budgets: HashMap<OrgId, Vec<Budget>>,
    notifications: HashMap<OrgId, Vec<AppNotification>>,
    invoices: HashMap<OrgId, Vec<Invoice>>,
    payment_methods: HashMap<OrgId, Vec<PaymentMethod>>,
    next_budget_id: BudgetId,
}

impl MockDb {
    fn user(&self) -> BackendResult<&UserProfile> {
        self.user
            .as_ref()
            .ok_or_else(|| BackendError::not_found("user", "current"))
    }

    fn organization_mut(&mut self, org_id: &str) -> BackendResult<&mut Organization> {
        self.organizations
            .iter_mut()
            .find(|o| o.id == org_id)
            .ok_or_else(|| BackendError::OrganizationNotFound(org_id.to_string()))
    }

    fn ensure_org(&self, org_id: &str) -> BackendResult<()> {
        if self.organizations.iter().any(|o| o.id == org_id) {
            Ok(())
        } else {
            Err(BackendError::OrganizationNotFound(org_id.to_string()))
        }
    }

    fn scoped<'a, T>(map: &'a mut HashMap<OrgId, Vec<T>>, org_id: &str) -> &'a mut Vec<T> {
        map.entry(org_id.to_string()).or_default()
    }
}

/// Seeded in-memory [`DataService`].
pub struct MemoryBackend {
    db: Mutex<MockDb>,
    latency: Duration,
    org_latency: HashMap<OrgId, Duration>,
    unavailable: AtomicBool,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::seeded()
    }
}

impl MemoryBackend {
    /// A backend with no organizations and no user.
    pub fn empty() -> Self {
        Self::from_db(MockDb {
            next_budget_id: 1,
            ..Default::default()
        })
    }

    /// A backend loaded with the demo user and organizations.
    pub fn seeded() -> Self {
        Self::from_db(seed())
    }

    fn from_db(db: MockDb) -> Self {
        Self {
            db: Mutex::new(db),
            latency: Duration::ZERO,
            org_latency: HashMap::new(),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Delay calls scoped to `org_id` by `latency` instead of the default.
    pub fn with_org_latency(mut self, org_id: impl Into<OrgId>, latency: Duration) -> Self {
        self.org_latency.insert(org_id.into(), latency);
        self
    }

    /// Make every subsequent call fail with [`BackendError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    async fn simulate(&self, org_id: Option<&str>) -> BackendResult<()> {
        let latency = org_id
            .and_then(|id| self.org_latency.get(id).copied())
            .unwrap_or(self.latency);

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable(
                "mock data service is offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DataService for MemoryBackend {
    async fn login(&self, email: &str) -> BackendResult<LoginResponse> {
        self.simulate(None).await?;
        let db = self.db.lock().await;

        let email = email.trim();
        let known = db
            .user
            .as_ref()
            .is_some_and(|u| u.email.eq_ignore_ascii_case(email));
        if !known && !email.eq_ignore_ascii_case(DEMO_EMAIL) {
            return Err(BackendError::InvalidCredentials);
        }

        debug!(email, "mock login accepted");
        Ok(LoginResponse {
            token: format!("mock-jwt-token-{}", Uuid::new_v4().simple()),
        })
    }

    async fn logout(&self) -> BackendResult<()> {
        self.simulate(None).await
    }

    async fn list_my_organizations(&self) -> BackendResult<Vec<Organization>> {
        self.simulate(None).await?;
        let db = self.db.lock().await;
        let user_id = db.user()?.id.clone();

        Ok(db
            .organizations
            .iter()
            .filter(|org| {
                db.members
                    .get(&org.id)
                    .is_some_and(|roster| roster.iter().any(|m| m.user_id == user_id))
            })
            .cloned()
            .collect())
    }

    async fn create_organization(&self, name: &str, slug: &str) -> BackendResult<Organization> {
        self.simulate(None).await?;
        let mut db = self.db.lock().await;
        let user = db.user()?.clone();

        let org = Organization {
            id: format!("org-{}", short_id()),
            name: name.to_string(),
            slug: slug.to_string(),
            plan: Plan::Free,
            currency: CurrencyCode::Usd,
            logo: None,
            billing_email: Some(user.email.clone()),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        };

        let admin = OrgMember {
            user_id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: OrgRole::Admin,
            avatar: user.avatar.clone(),
            status: MemberStatus::Active,
            joined_at: Utc::now(),
        };
        let welcome = AppNotification {
            id: short_id(),
            org_id: org.id.clone(),
            title: format!("Welcome to {}", name),
            description: "Organization created successfully.".to_string(),
            timestamp: Utc::now(),
            kind: NotificationKind::Success,
            read: false,
        };

        db.members.insert(org.id.clone(), vec![admin]);
        db.expenses.insert(org.id.clone(), Vec::new());
        db.budgets.insert(org.id.clone(), Vec::new());
        db.notifications.insert(org.id.clone(), vec![welcome]);
        db.organizations.push(org.clone());

        debug!(org_id = %org.id, "mock organization created");
        Ok(org)
    }

    async fn get_members(&self, org_id: &str) -> BackendResult<Vec<OrgMember>> {
        self.simulate(Some(org_id)).await?;
        let db = self.db.lock().await;
        db.ensure_org(org_id)?;
        Ok(db.members.get(org_id).cloned().unwrap_or_default())
    }

    async fn invite_member(
        &self,
        org_id: &str,
        email: &str,
        role: OrgRole,
    ) -> BackendResult<OrgMember> {
        self.simulate(Some(org_id)).await?;
        let mut db = self.db.lock().await;
        db.ensure_org(org_id)?;

        let email = email.trim();
        let name = email.split('@').next().unwrap_or(email).to_string();
        let member = OrgMember {
            user_id: format!("u-{}", short_id()),
            name,
            email: email.to_string(),
            role,
            avatar: None,
            status: MemberStatus::Invited,
            joined_at: Utc::now(),
        };

        MockDb::scoped(&mut db.members, org_id).push(member.clone());
        Ok(member)
    }

    async fn remove_member(&self, org_id: &str, user_id: &str) -> BackendResult<UserId> {
        self.simulate(Some(org_id)).await?;
        let mut db = self.db.lock().await;
        db.ensure_org(org_id)?;

        if db.user()?.id == user_id {
            return Err(BackendError::SelfRemoval);
        }

        MockDb::scoped(&mut db.members, org_id).retain(|m| m.user_id != user_id);
        Ok(user_id.to_string())
    }

    async fn update_member_role(
        &self,
        org_id: &str,
        user_id: &str,
        role: OrgRole,
    ) -> BackendResult<OrgMember> {
        self.simulate(Some(org_id)).await?;
        let mut db = self.db.lock().await;
        db.ensure_org(org_id)?;

        let member = MockDb::scoped(&mut db.members, org_id)
            .iter_mut()
            .find(|m| m.user_id == user_id)
            .ok_or_else(|| BackendError::MemberNotFound(user_id.to_string()))?;
        member.role = role;
        Ok(member.clone())
    }

    async fn update_organization(
        &self,
        org_id: &str,
        update: &OrganizationUpdate,
    ) -> BackendResult<Organization> {
        self.simulate(Some(org_id)).await?;
        let mut db = self.db.lock().await;
        let org = db.organization_mut(org_id)?;
        org.apply(update);
        Ok(org.clone())
    }

    async fn add_category(&self, org_id: &str, name: &str) -> BackendResult<String> {
        self.simulate(Some(org_id)).await?;
        let mut db = self.db.lock().await;
        db.organization_mut(org_id)?.add_category(name);
        Ok(name.to_string())
    }

    async fn remove_category(&self, org_id: &str, name: &str) -> BackendResult<String> {
        self.simulate(Some(org_id)).await?;
        let mut db = self.db.lock().await;
        db.organization_mut(org_id)?.remove_category(name);
        Ok(name.to_string())
    }

    async fn list_expenses(&self, org_id: &str) -> BackendResult<Vec<Expense>> {
        self.simulate(Some(org_id)).await?;
        let db = self.db.lock().await;
        db.ensure_org(org_id)?;
        Ok(db.expenses.get(org_id).cloned().unwrap_or_default())
    }

    async fn create_expense(&self, org_id: &str, expense: &NewExpense) -> BackendResult<Expense> {
        self.simulate(Some(org_id)).await?;
        let mut db = self.db.lock().await;
        db.ensure_org(org_id)?;
        let user = db.user()?.clone();

        let created = Expense {
            id: short_id(),
            org_id: org_id.to_string(),
            merchant: expense.merchant.clone(),
            date: expense.date.clone(),
            category: expense.category.clone(),
            amount: expense.amount,
            status: expense.status,
            receipt_url: expense.receipt_url.clone(),
            description: expense.description.clone(),
            user_id: user.id,
            user_name: Some(user.name),
        };

        MockDb::scoped(&mut db.expenses, org_id).insert(0, created.clone());
        Ok(created)
    }

    async fn update_expense(
        &self,
        org_id: &str,
        id: &str,
        update: &ExpenseUpdate,
    ) -> BackendResult<Expense> {
        self.simulate(Some(org_id)).await?;
        let mut db = self.db.lock().await;
        db.ensure_org(org_id)?;

        let expense = MockDb::scoped(&mut db.expenses, org_id)
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| BackendError::not_found("expense", id))?;
        expense.apply(update);
        Ok(expense.clone())
    }

    async fn delete_expense(&self, org_id: &str, id: &str) -> BackendResult<ExpenseId> {
        self.simulate(Some(org_id)).await?;
        let mut db = self.db.lock().await;
        db.ensure_org(org_id)?;
        MockDb::scoped(&mut db.expenses, org_id).retain(|e| e.id != id);
        Ok(id.to_string())
    }

    async fn list_budgets(&self, org_id: &str) -> BackendResult<Vec<Budget>> {
        self.simulate(Some(org_id)).await?;
        let db = self.db.lock().await;
        db.ensure_org(org_id)?;
        Ok(db.budgets.get(org_id).cloned().unwrap_or_default())
    }

    async fn create_budget(&self, org_id: &str, budget: &NewBudget) -> BackendResult<Budget> {
        self.simulate(Some(org_id)).await?;
        let mut db = self.db.lock().await;
        db.ensure_org(org_id)?;

        let id = db.next_budget_id;
        db.next_budget_id += 1;

        let created = Budget {
            id,
            org_id: org_id.to_string(),
            category: budget.category.clone(),
            spent: budget.spent,
            total: budget.total,
            period: budget.period,
            icon: budget.icon.clone(),
            color: budget.color.clone(),
            background: budget.background.clone(),
        };

        MockDb::scoped(&mut db.budgets, org_id).push(created.clone());
        Ok(created)
    }

    async fn update_budget(
        &self,
        org_id: &str,
        id: BudgetId,
        update: &BudgetUpdate,
    ) -> BackendResult<Budget> {
        self.simulate(Some(org_id)).await?;
        let mut db = self.db.lock().await;
        db.ensure_org(org_id)?;

        let budget = MockDb::scoped(&mut db.budgets, org_id)
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| BackendError::not_found("budget", id))?;
        budget.apply(update);
        Ok(budget.clone())
    }

    async fn delete_budget(&self, org_id: &str, id: BudgetId) -> BackendResult<BudgetId> {
        self.simulate(Some(org_id)).await?;
        let mut db = self.db.lock().await;
        db.ensure_org(org_id)?;
        MockDb::scoped(&mut db.budgets, org_id).retain(|b| b.id != id);
        Ok(id)
    }

    async fn list_notifications(&self, org_id: &str) -> BackendResult<Vec<AppNotification>> {
        self.simulate(Some(org_id)).await?;
        let db = self.db.lock().await;
        db.ensure_org(org_id)?;
        Ok(db.notifications.get(org_id).cloned().unwrap_or_default())
    }

    async fn mark_notification_read(
        &self,
        org_id: &str,
        id: &str,
    ) -> BackendResult<NotificationId> {
        self.simulate(Some(org_id)).await?;
        let mut db = self.db.lock().await;
        db.ensure_org(org_id)?;

        let notification = MockDb::scoped(&mut db.notifications, org_id)
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| BackendError::not_found("notification", id))?;
        notification.read = true;
        Ok(id.to_string())
    }

    async fn mark_all_notifications_read(&self, org_id: &str) -> BackendResult<bool> {
        self.simulate(Some(org_id)).await?;
        let mut db = self.db.lock().await;
        db.ensure_org(org_id)?;
        for notification in MockDb::scoped(&mut db.notifications, org_id) {
            notification.read = true;
        }
        Ok(true)
    }

    async fn get_user(&self) -> BackendResult<UserProfile> {
        self.simulate(None).await?;
        let db = self.db.lock().await;
        db.user().cloned()
    }

    async fn update_user(&self, update: &UserUpdate) -> BackendResult<UserProfile> {
        self.simulate(None).await?;
        let mut db = self.db.lock().await;
        let user = db
            .user
            .as_mut()
            .ok_or_else(|| BackendError::not_found("user", "current"))?;
        user.apply(update);
        Ok(user.clone())
    }

    async fn get_invoices(&self, org_id: &str) -> BackendResult<Vec<Invoice>> {
        self.simulate(Some(org_id)).await?;
        let db = self.db.lock().await;
        db.ensure_org(org_id)?;
        Ok(db.invoices.get(org_id).cloned().unwrap_or_default())
    }

    async fn get_payment_methods(&self, org_id: &str) -> BackendResult<Vec<PaymentMethod>> {
        self.simulate(Some(org_id)).await?;
        let db = self.db.lock().await;
        db.ensure_org(org_id)?;
        Ok(db.payment_methods.get(org_id).cloned().unwrap_or_default())
    }
}

// ============================================================================
// Seed data
// ============================================================================

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..9].to_string()
}

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn categories(names: &[&str]) -> Vec<String> {
    names.iter().map(|c| c.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn expense(
    id: &str,
    org_id: &str,
    merchant: &str,
    date: &str,
    category: &str,
    amount: Decimal,
    status: ExpenseStatus,
    user: (&str, &str),
) -> Expense {
    Expense {
        id: id.to_string(),
        org_id: org_id.to_string(),
        merchant: merchant.to_string(),
        date: date.to_string(),
        category: category.to_string(),
        amount,
        status,
        receipt_url: None,
        description: None,
        user_id: user.0.to_string(),
        user_name: Some(user.1.to_string()),
    }
}

fn budget(
    id: BudgetId,
    org_id: &str,
    category: &str,
    spent: i64,
    total: i64,
    icon: &str,
    color: &str,
) -> Budget {
    Budget {
        id,
        org_id: org_id.to_string(),
        category: category.to_string(),
        spent: Decimal::from(spent),
        total: Decimal::from(total),
        period: BudgetPeriod::Monthly,
        icon: Some(icon.to_string()),
        color: Some(format!("text-{}-500", color)),
        background: Some(format!("bg-{}-500", color)),
    }
}

fn member(
    user_id: &str,
    name: &str,
    email: &str,
    role: OrgRole,
    joined_at: DateTime<Utc>,
) -> OrgMember {
    OrgMember {
        user_id: user_id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        avatar: None,
        status: MemberStatus::Active,
        joined_at,
    }
}

fn seed() -> MockDb {
    const ELEANOR: (&str, &str) = ("u1", "Eleanor Pena");
    const JOHN: (&str, &str) = ("u2", "John Doe");

    let user = UserProfile {
        id: "u1".to_string(),
        name: "Eleanor Pena".to_string(),
        email: "eleanor@expenseflow.com".to_string(),
        avatar: None,
        default_org_id: Some("org1".to_string()),
        role: Some("Finance Manager".to_string()),
        phone: Some("+1 (555) 123-4567".to_string()),
        location: Some("San Francisco, CA".to_string()),
        bio: Some("Finance enthusiast looking to streamline operations.".to_string()),
    };

    let organizations = vec![
        Organization {
            id: "org1".to_string(),
            name: "Acme Corp".to_string(),
            slug: "acme".to_string(),
            plan: Plan::Pro,
            currency: CurrencyCode::Usd,
            logo: None,
            billing_email: Some("billing@acme.com".to_string()),
            categories: categories(&["Software", "Travel", "Office Supplies", "Marketing", "Food"]),
        },
        Organization {
            id: "org2".to_string(),
            name: "Blueberry Labs".to_string(),
            slug: "blueberry".to_string(),
            plan: Plan::Free,
            currency: CurrencyCode::Eur,
            logo: None,
            billing_email: Some("accounts@blueberry.io".to_string()),
            categories: categories(&["Software", "Hosting", "Contractors"]),
        },
    ];

    let members = HashMap::from([
        (
            "org1".to_string(),
            vec![
                member(
                    "u1",
                    "Eleanor Pena",
                    "eleanor@expenseflow.com",
                    OrgRole::Admin,
                    at(2023, 1, 1),
                ),
                member("u2", "John Doe", "john@acme.com", OrgRole::Member, at(2023, 2, 15)),
            ],
        ),
        (
            "org2".to_string(),
            vec![member(
                "u1",
                "Eleanor Pena",
                "eleanor@expenseflow.com",
                OrgRole::Member,
                at(2023, 5, 1),
            )],
        ),
    ]);

    let expenses = HashMap::from([
        (
            "org1".to_string(),
            vec![
                expense(
                    "1",
                    "org1",
                    "Figma",
                    "Aug 28, 2024",
                    "Software",
                    Decimal::new(14400, 2),
                    ExpenseStatus::Approved,
                    ELEANOR,
                ),
                expense(
                    "2",
                    "org1",
                    "United Airlines",
                    "Aug 27, 2024",
                    "Travel",
                    Decimal::new(85320, 2),
                    ExpenseStatus::Pending,
                    JOHN,
                ),
                expense(
                    "3",
                    "org1",
                    "Amazon",
                    "Aug 25, 2024",
                    "Office Supplies",
                    Decimal::new(7899, 2),
                    ExpenseStatus::Rejected,
                    ELEANOR,
                ),
            ],
        ),
        (
            "org2".to_string(),
            vec![expense(
                "4",
                "org2",
                "Slack",
                "Aug 22, 2024",
                "Software",
                Decimal::new(2500, 2),
                ExpenseStatus::Approved,
                ELEANOR,
            )],
        ),
    ]);

    let budgets = HashMap::from([
        (
            "org1".to_string(),
            vec![
                budget(1, "org1", "Software", 5200, 8000, "dns", "blue"),
                budget(2, "org1", "Travel", 8400, 12000, "flight", "purple"),
            ],
        ),
        (
            "org2".to_string(),
            vec![budget(3, "org2", "Software", 25, 100, "dns", "green")],
        ),
    ]);

    let notifications = HashMap::from([
        (
            "org1".to_string(),
            vec![AppNotification {
                id: "1".to_string(),
                org_id: "org1".to_string(),
                title: "Expense Approved".to_string(),
                description: "Figma Subscription approved.".to_string(),
                timestamp: at(2024, 8, 28),
                kind: NotificationKind::Success,
                read: false,
            }],
        ),
        ("org2".to_string(), Vec::new()),
    ]);

    let invoices = HashMap::from([(
        "org1".to_string(),
        vec![
            Invoice {
                id: "INV-2023-001".to_string(),
                date: "Oct 01, 2023".to_string(),
                amount: Decimal::new(2900, 2),
                status: InvoiceStatus::Paid,
            },
            Invoice {
                id: "INV-2023-002".to_string(),
                date: "Sep 01, 2023".to_string(),
                amount: Decimal::new(2900, 2),
                status: InvoiceStatus::Paid,
            },
        ],
    )]);

    let payment_methods = HashMap::from([(
        "org1".to_string(),
        vec![PaymentMethod {
            id: "pm_1".to_string(),
            brand: CardBrand::Visa,
            last4: "4242".to_string(),
            expiry: "12/24".to_string(),
        }],
    )]);

    MockDb {
        user: Some(user),
        organizations,
        members,
        expenses,
        budgets,
        notifications,
        invoices,
        payment_methods,
        next_budget_id: 4,
    }
}
