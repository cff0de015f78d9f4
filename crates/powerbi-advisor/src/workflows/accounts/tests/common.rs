use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::workflows::accounts::{SignUpProfile, UserId, UserIdentity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) struct Note {
    pub(super) title: String,
}

pub(super) fn note(title: &str) -> Note {
    Note {
        title: title.to_string(),
    }
}

pub(super) fn identity(uid: &str, email: &str) -> UserIdentity {
    let at = Utc
        .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    UserIdentity {
        uid: UserId(uid.to_string()),
        email: email.to_string(),
        display_name: None,
        company: String::new(),
        role: String::new(),
        created_at: at,
        last_login_at: at,
    }
}

pub(super) fn profile() -> SignUpProfile {
    SignUpProfile {
        display_name: Some("Dana Analyst".to_string()),
        company: "Contoso".to_string(),
        role: "BI Lead".to_string(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
