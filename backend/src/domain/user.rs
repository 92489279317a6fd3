//! User identity model.
//!
//! Identity is self-asserted: a user is nothing more than a (name,
//! department) pair the store has seen before. Two comparison rules apply to
//! that pair and they are deliberately different:
//!
//! - [`UserIdentity::matches`] is the *identity match*, a literal,
//!   case- and whitespace-sensitive comparison used for deduplication.
//! - [`Department::routes_to_technicians`] is the *technician routing* rule,
//!   a case-insensitive comparison against `"ti"` used only to pick the
//!   landing [`Workspace`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Department value that marks the IT/technician group.
pub const TECHNICIAN_DEPARTMENT: &str = "ti";

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyName,
    EmptyDepartment,
}

impl UserValidationError {
    /// Request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::InvalidId => "id",
            Self::EmptyName => "name",
            Self::EmptyDepartment => "department",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must not carry surrounding whitespace"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyDepartment => write!(f, "department must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Opaque user identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Requester name exactly as asserted by the caller.
///
/// Must contain something other than whitespace, but is stored verbatim:
/// `"Ana"` and `"Ana "` are different people as far as the store is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a [`PersonName`].
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Free-text organisational unit, stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Department(String);

impl Department {
    /// Validate and construct a [`Department`].
    pub fn new(department: impl Into<String>) -> Result<Self, UserValidationError> {
        let department = department.into();
        if department.trim().is_empty() {
            return Err(UserValidationError::EmptyDepartment);
        }
        Ok(Self(department))
    }

    /// Technician routing rule: case-insensitive match against `"ti"`.
    ///
    /// This is intentionally looser than equality; `"TI"` and `"ti"` are
    /// different departments that both route to the technician workspace.
    ///
    /// # Examples
    /// ```
    /// use helpdesk::domain::Department;
    ///
    /// let upper = Department::new("TI").expect("department");
    /// let lower = Department::new("ti").expect("department");
    /// assert_ne!(upper, lower);
    /// assert!(upper.routes_to_technicians());
    /// assert!(lower.routes_to_technicians());
    /// ```
    #[must_use]
    pub fn routes_to_technicians(&self) -> bool {
        self.0.to_lowercase() == TECHNICIAN_DEPARTMENT
    }
}

impl AsRef<str> for Department {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Department> for String {
    fn from(value: Department) -> Self {
        value.0
    }
}

impl TryFrom<String> for Department {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Landing view chosen after login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workspace {
    /// The technician queue with status and priority filters.
    Technician,
    /// The requester desk: ticket form, own and department tickets.
    Requester,
}

impl Workspace {
    /// Pick the workspace for a department using the technician routing rule.
    #[must_use]
    pub fn for_department(department: &Department) -> Self {
        if department.routes_to_technicians() {
            Self::Technician
        } else {
            Self::Requester
        }
    }
}

/// Claimed (name, department) pair: the natural key of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserIdentity {
    name: PersonName,
    department: Department,
}

impl UserIdentity {
    /// Build an identity from validated components.
    #[must_use]
    pub const fn new(name: PersonName, department: Department) -> Self {
        Self { name, department }
    }

    /// Validate raw input. The name is checked before the department.
    pub fn try_from_parts(
        name: impl Into<String>,
        department: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let name = PersonName::new(name)?;
        let department = Department::new(department)?;
        Ok(Self::new(name, department))
    }

    /// Claimed name.
    #[must_use]
    pub const fn name(&self) -> &PersonName {
        &self.name
    }

    /// Claimed department.
    #[must_use]
    pub const fn department(&self) -> &Department {
        &self.department
    }

    /// Identity match: literal comparison of both fields.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        self.name == user.name && self.department == user.department
    }
}

/// A stored user.
///
/// ## Invariants
/// - `name` and `department` are non-blank and kept verbatim.
/// - Records are never updated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: PersonName,
    department: Department,
}

impl User {
    /// Assemble a user from a store-assigned id and its identity.
    #[must_use]
    pub fn new(id: UserId, identity: UserIdentity) -> Self {
        let UserIdentity { name, department } = identity;
        Self {
            id,
            name,
            department,
        }
    }

    /// Fallible constructor from raw strings.
    pub fn try_from_strings(
        id: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let id = UserId::new(id)?;
        let identity = UserIdentity::try_from_parts(name, department)?;
        Ok(Self::new(id, identity))
    }

    /// Store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Name as asserted at first login.
    #[must_use]
    pub const fn name(&self) -> &PersonName {
        &self.name
    }

    /// Department as asserted at first login.
    #[must_use]
    pub const fn department(&self) -> &Department {
        &self.department
    }

    /// Landing workspace for this user.
    #[must_use]
    pub fn workspace(&self) -> Workspace {
        Workspace::for_department(&self.department)
    }

    /// The (name, department) pair of this user.
    #[must_use]
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(self.name.clone(), self.department.clone())
    }
}
