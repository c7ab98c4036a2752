use tracing::{info, warn};

use crate::{
    db::PersistenceError,
    email::EmailAddress,
    error::AppError,
    subscriptions::{dto::SubscribeRequest, repo::SubscriberRepo, repo_types::Subscriber},
};

pub async fn subscribe(
    subscribers: &dyn SubscriberRepo,
    req: SubscribeRequest,
) -> Result<Subscriber, AppError> {
    let email =
        EmailAddress::parse(&req.email).map_err(|e| AppError::validation("email", e.to_string()))?;

    let existing = subscribers
        .find_by_email(email.as_ref())
        .await
        .map_err(|e| AppError::from_persistence(e, "email"))?;
    if existing.is_some() {
        warn!(email = %email, "already subscribed");
        return Err(AppError::email_taken());
    }

    let subscriber = subscribers.create(&email).await.map_err(|e| {
        if matches!(e, PersistenceError::UniqueViolation { .. }) {
            warn!(email = %email, "concurrent subscription lost the unique race");
        }
        AppError::from_persistence(e, "email")
    })?;

    info!(subscriber_id = %subscriber.id, email = %subscriber.email, "subscribed");
    Ok(subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemorySubscribers, RacingSubscribers};

    fn req(email: &str) -> SubscribeRequest {
        SubscribeRequest {
            email: email.into(),
        }
    }

    #[tokio::test]
    async fn stores_normalized_email() {
        let subs = InMemorySubscribers::default();
        let sub = subscribe(&subs, req("  News@Letter.IO ")).await.unwrap();
        assert_eq!(sub.email, "news@letter.io");
    }

    #[tokio::test]
    async fn second_subscription_differing_only_in_case_conflicts() {
        let subs = InMemorySubscribers::default();
        subscribe(&subs, req("A@B.com")).await.expect("first");

        let err = subscribe(&subs, req("a@b.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { field: "email", .. }), "got {err:?}");
        assert_eq!(subs.len(), 1);
    }

    #[tokio::test]
    async fn racing_insert_is_still_a_conflict() {
        let subs = RacingSubscribers::default();
        subscribe(&subs, req("a@b.com")).await.expect("first");

        let err = subscribe(&subs, req("a@b.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { field: "email", .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn blank_and_malformed_emails_are_rejected_before_lookup() {
        let subs = InMemorySubscribers::default();

        for (raw, message) in [
            ("   ", "Email cannot be empty"),
            ("nobody.example.com", "Invalid email format"),
        ] {
            match subscribe(&subs, req(raw)).await.unwrap_err() {
                AppError::Validation(errors) => {
                    assert_eq!(errors.get("email"), Some(&[message.to_string()][..]));
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }
        assert_eq!(subs.calls(), 0);
    }
}
