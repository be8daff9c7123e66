use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum HireStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
}

impl HireStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HireStatus::Pending => "pending",
            HireStatus::Accepted => "accepted",
            HireStatus::Rejected => "rejected",
            HireStatus::Completed => "completed",
        }
    }

    /// Legal edges of the request lifecycle.
    pub fn can_transition_to(self, next: HireStatus) -> bool {
        matches!(
            (self, next),
            (HireStatus::Pending, HireStatus::Accepted)
                | (HireStatus::Pending, HireStatus::Rejected)
                | (HireStatus::Accepted, HireStatus::Completed)
        )
    }

    /// What the profile page shows as "hired".
    pub fn counts_as_hired(self) -> bool {
        matches!(self, HireStatus::Pending | HireStatus::Accepted)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HiringRequest {
    pub id: String,
    pub homeowner_id: String,
    pub architect_id: String,
    pub message: String,
    pub post_id: Option<String>,
    pub status: HireStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HiringStatusResponse {
    pub status: Option<HireStatus>,
    pub hired: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HiringDirection {
    Incoming,
    Outgoing,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHiringRequest {
    pub architect_id: String,
    #[serde(default)]
    pub message: String,
    pub post_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_edges() {
        use HireStatus::*;
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Accepted.can_transition_to(Completed));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Rejected.can_transition_to(Accepted));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Accepted.can_transition_to(Rejected));
    }

    #[test]
    fn hired_means_pending_or_accepted() {
        assert!(HireStatus::Pending.counts_as_hired());
        assert!(HireStatus::Accepted.counts_as_hired());
        assert!(!HireStatus::Rejected.counts_as_hired());
        assert!(!HireStatus::Completed.counts_as_hired());
    }
}
