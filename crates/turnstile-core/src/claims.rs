use serde::{Deserialize, Serialize};

/// Claims decoded from the session credential.
///
/// Field names match the wire payload issued by the login flow (`user_Id`,
/// `employee_Id`). Claims are derived data: recomputed on every navigation,
/// never cached across them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "user_Id")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        rename = "employee_Id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Raw role claim as issued; interpret through [`Claims::role`].
    pub role: String,
    /// Issue time, unix seconds.
    #[serde(default)]
    pub iat: u64,
    /// Expiry deadline, unix seconds.
    pub exp: u64,
}

impl Claims {
    /// Typed view of the role claim. Unrecognized values map to
    /// [`Role::Unknown`] and are denied everywhere by policy.
    #[must_use]
    pub fn role(&self) -> Role {
        Role::from_claim(&self.role)
    }

    /// Strict freshness: a credential with `exp == now` is already expired.
    /// Must be re-checked at every evaluation, not only at decode time.
    #[must_use]
    pub fn is_fresh(&self, now: u64) -> bool {
        self.exp > now
    }
}

/// Authorization role carried by the session credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Manager,
    Pic,
    Employee,
    /// Any role string the policy does not know about.
    Unknown,
}

impl Role {
    /// Role claim values are matched exactly as the login flow issues them.
    #[must_use]
    pub fn from_claim(value: &str) -> Self {
        match value {
            "Manager" => Role::Manager,
            "PIC" => Role::Pic,
            "Employee" => Role::Employee,
            _ => Role::Unknown,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Manager => "Manager",
            Role::Pic => "PIC",
            Role::Employee => "Employee",
            Role::Unknown => "unknown",
        };
        f.write_str(s)
    }
}
