//! Account data model.
//!
//! An [`Account`] is the single identity-store record for a user: credentials,
//! verification state, the embedded social sets, and the saved/watched catalog
//! sets all live on one document so every mutation touches at most two records.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::CatalogItemId;
use super::handle::Handle;

/// Validation errors for account component values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyEmail,
    InvalidEmail,
    EmptyDisplayName,
    DisplayNameTooLong { max: usize },
    InvalidOneTimeCode,
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::InvalidOneTimeCode => {
                write!(f, "one-time code must be exactly {CODE_LENGTH} digits")
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only; deliverability is proven by the one-time code.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Case-insensitive email address.
///
/// ## Invariants
/// - Stored trimmed and lowercased; comparisons are on the normalised form.
/// - Must match the basic `local@domain.tld` shape.
///
/// # Examples
/// ```
/// use backend::domain::Email;
///
/// let email = Email::new("  Dave@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "dave@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`], normalising the input.
    pub fn new(email: impl Into<String>) -> Result<Self, AccountValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, AccountValidationError> {
        let normalised = email.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(AccountValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&normalised) {
            return Err(AccountValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 100;

/// Optional public name shown alongside the handle.
///
/// ## Invariants
/// - Must not be blank once trimmed of whitespace.
/// - At most [`DISPLAY_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(display_name: impl Into<String>) -> Result<Self, AccountValidationError> {
        Self::from_owned(display_name.into())
    }

    fn from_owned(display_name: String) -> Result<Self, AccountValidationError> {
        if display_name.trim().is_empty() {
            return Err(AccountValidationError::EmptyDisplayName);
        }
        if display_name.chars().count() > DISPLAY_NAME_MAX {
            return Err(AccountValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(display_name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Number of decimal digits in a one-time code.
pub const CODE_LENGTH: usize = 6;

/// How long a freshly issued one-time code stays valid.
pub const CODE_VALIDITY_MINUTES: i64 = 10;

/// One-time verification code with its expiry instant.
///
/// Expiry is checked lazily when the code is consumed; nothing sweeps stale
/// codes in the background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneTimeCode {
    code: String,
    expires_at: DateTime<Utc>,
}

impl OneTimeCode {
    /// Construct a code from known parts, validating the digit format.
    pub fn new(
        code: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, AccountValidationError> {
        let code = code.into();
        if code.len() != CODE_LENGTH || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AccountValidationError::InvalidOneTimeCode);
        }
        Ok(Self { code, expires_at })
    }

    /// Issue a fresh random code valid for [`CODE_VALIDITY_MINUTES`] from `now`.
    pub fn issue(now: DateTime<Utc>) -> Self {
        let code = rand::thread_rng().gen_range(100_000..=999_999u32);
        Self {
            code: code.to_string(),
            expires_at: now + Duration::minutes(CODE_VALIDITY_MINUTES),
        }
    }

    /// The digit string dispatched to the account's email address.
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Instant after which the code stops being accepted.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether `candidate` matches this code and the code is still valid.
    pub fn matches(&self, candidate: &str, now: DateTime<Utc>) -> bool {
        now <= self.expires_at && candidate == self.code
    }
}

/// Identity-store record for one user.
///
/// ## Invariants
/// - `handle` and `email` are stored normalised and are unique across the
///   store (enforced at registration).
/// - The social sets and catalog sets contain no duplicates; mutators report
///   whether they changed anything.
/// - A handle never appears in this account's own sets, and a pending request
///   is removed before the same handle lands in `followers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    id: Uuid,
    handle: Handle,
    email: Email,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    display_name: Option<DisplayName>,
    password_hash: String,
    verified: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    one_time_code: Option<OneTimeCode>,
    #[serde(default)]
    followers: Vec<Handle>,
    #[serde(default)]
    following: Vec<Handle>,
    #[serde(default)]
    follow_requests: Vec<Handle>,
    #[serde(default)]
    saved: Vec<CatalogItemId>,
    #[serde(default)]
    watched: Vec<CatalogItemId>,
    created_at: DateTime<Utc>,
}

fn insert_unique<T: PartialEq>(set: &mut Vec<T>, value: T) -> bool {
    if set.contains(&value) {
        return false;
    }
    set.push(value);
    true
}

fn remove_value<T: PartialEq>(set: &mut Vec<T>, value: &T) -> bool {
    let before = set.len();
    set.retain(|existing| existing != value);
    set.len() != before
}

impl Account {
    /// Create a fresh unverified account with empty social and catalog sets.
    pub fn new(
        handle: Handle,
        email: Email,
        display_name: Option<DisplayName>,
        password_hash: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            handle,
            email,
            display_name,
            password_hash,
            verified: false,
            one_time_code: None,
            followers: Vec::new(),
            following: Vec::new(),
            follow_requests: Vec::new(),
            saved: Vec::new(),
            watched: Vec::new(),
            created_at,
        }
    }

    /// Stable account identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Normalised unique handle.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Normalised unique email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Optional public display name.
    pub fn display_name(&self) -> Option<&DisplayName> {
        self.display_name.as_ref()
    }

    /// Argon2 PHC hash of the account password.
    pub fn password_hash(&self) -> &str {
        self.password_hash.as_str()
    }

    /// Whether the email address has been proven via a one-time code.
    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Currently pending one-time code, if any.
    pub fn one_time_code(&self) -> Option<&OneTimeCode> {
        self.one_time_code.as_ref()
    }

    /// Handles approved to follow this account.
    pub fn followers(&self) -> &[Handle] {
        &self.followers
    }

    /// Handles this account follows.
    pub fn following(&self) -> &[Handle] {
        &self.following
    }

    /// Inbound pending follow requests, oldest first.
    pub fn follow_requests(&self) -> &[Handle] {
        &self.follow_requests
    }

    /// Catalog items saved for later.
    pub fn saved(&self) -> &[CatalogItemId] {
        &self.saved
    }

    /// Catalog items marked as watched.
    pub fn watched(&self) -> &[CatalogItemId] {
        &self.watched
    }

    /// Instant the account was registered.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether `handle` is an approved follower of this account.
    pub fn has_follower(&self, handle: &Handle) -> bool {
        self.followers.contains(handle)
    }

    /// Whether this account follows `handle`.
    pub fn is_following(&self, handle: &Handle) -> bool {
        self.following.contains(handle)
    }

    /// Whether `handle` has a pending follow request to this account.
    pub fn has_pending_request_from(&self, handle: &Handle) -> bool {
        self.follow_requests.contains(handle)
    }

    /// Whether `viewer` may see this account's gated lists.
    ///
    /// Only the account owner and approved followers qualify; anonymous
    /// viewers never do.
    pub fn permits_gated_view(&self, viewer: Option<&Handle>) -> bool {
        viewer.is_some_and(|viewer| viewer == &self.handle || self.followers.contains(viewer))
    }

    /// Record a pending follow request. Returns `false` when already pending.
    pub fn add_follow_request(&mut self, requester: Handle) -> bool {
        insert_unique(&mut self.follow_requests, requester)
    }

    /// Drop a pending follow request. Returns `false` when absent.
    pub fn remove_follow_request(&mut self, requester: &Handle) -> bool {
        remove_value(&mut self.follow_requests, requester)
    }

    /// Add an approved follower. Returns `false` when already present.
    pub fn add_follower(&mut self, follower: Handle) -> bool {
        insert_unique(&mut self.followers, follower)
    }

    /// Remove an approved follower. Returns `false` when absent.
    pub fn remove_follower(&mut self, follower: &Handle) -> bool {
        remove_value(&mut self.followers, follower)
    }

    /// Record that this account follows `target`. Returns `false` when already present.
    pub fn add_following(&mut self, target: Handle) -> bool {
        insert_unique(&mut self.following, target)
    }

    /// Record that this account no longer follows `target`. Returns `false` when absent.
    pub fn remove_following(&mut self, target: &Handle) -> bool {
        remove_value(&mut self.following, target)
    }

    /// Save a catalog item for later. Returns whether the set changed.
    pub fn save_item(&mut self, item: CatalogItemId) -> bool {
        insert_unique(&mut self.saved, item)
    }

    /// Remove a catalog item from the saved set. Returns whether the set changed.
    pub fn remove_saved(&mut self, item: CatalogItemId) -> bool {
        remove_value(&mut self.saved, &item)
    }

    /// Mark a catalog item as watched. Returns whether the set changed.
    pub fn mark_watched(&mut self, item: CatalogItemId) -> bool {
        insert_unique(&mut self.watched, item)
    }

    /// Remove a catalog item from the watched set. Returns whether the set changed.
    pub fn remove_watched(&mut self, item: CatalogItemId) -> bool {
        remove_value(&mut self.watched, &item)
    }

    /// Store a pending one-time code, replacing any previous one.
    pub fn set_one_time_code(&mut self, code: OneTimeCode) {
        self.one_time_code = Some(code);
    }

    /// Clear the pending one-time code after consumption.
    pub fn clear_one_time_code(&mut self) {
        self.one_time_code = None;
    }

    /// Mark the account's email as verified.
    pub fn mark_verified(&mut self) {
        self.verified = true;
    }

    /// Replace the stored password hash.
    pub fn set_password_hash(&mut self, hash: String) {
        self.password_hash = hash;
    }
}
