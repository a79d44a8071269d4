use crate::entities::subscription_entity as subscriptions;
use crate::error::{AppError, AppResult};
use crate::models::{MAX_WINDOW_YEAR, Period, SubscriptionFilter};
use crate::services::SubscriptionService;

/// Index used as the end of an open-ended subscription. A summary window can
/// never extend past December of `MAX_WINDOW_YEAR`, so this always clips to the
/// window's upper bound.
pub const OPEN_ENDED_INDEX: i64 = MAX_WINDOW_YEAR as i64 * 12 + 12;

/// Inclusive `[from, to]` month range of a summary query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingWindow {
    from: Period,
    to: Period,
}

impl BillingWindow {
    /// Fails with `ValidationError` when either bound is out of range, and with
    /// `InvalidRange` when `to` precedes `from`.
    pub fn new(from: Period, to: Period) -> AppResult<Self> {
        from.validate()?;
        to.validate()?;
        if to.index() < from.index() {
            return Err(AppError::InvalidRange(format!(
                "period end {to} precedes period start {from}"
            )));
        }
        Ok(Self { from, to })
    }

    pub fn start(&self) -> Period {
        self.from
    }

    pub fn end(&self) -> Period {
        self.to
    }

    /// Months of `[start, end]` that fall inside the window.
    fn billed_months(&self, start: i64, end: i64) -> i64 {
        let overlap_start = start.max(self.from.index());
        let overlap_end = end.min(self.to.index());
        if overlap_end >= overlap_start {
            overlap_end - overlap_start + 1
        } else {
            0
        }
    }

    /// Amount one subscription accrues inside the window.
    pub fn accrued(&self, subscription: &subscriptions::Model) -> i64 {
        let start = Period::new(subscription.start_month, subscription.start_year).index();
        let end = subscription
            .end()
            .map(|(month, year)| Period::new(month, year).index())
            .unwrap_or(OPEN_ENDED_INDEX);

        self.billed_months(start, end).saturating_mul(subscription.price)
    }

    /// Sum of `accrued` over every record; `0` for an empty slice.
    pub fn total(&self, records: &[subscriptions::Model]) -> i64 {
        records
            .iter()
            .fold(0i64, |total, record| total.saturating_add(self.accrued(record)))
    }
}

/// Cost aggregation over a window, fed by the store's filtered read.
#[derive(Clone)]
pub struct SummaryService {
    subscription_service: SubscriptionService,
}

impl SummaryService {
    pub fn new(subscription_service: SubscriptionService) -> Self {
        Self {
            subscription_service,
        }
    }

    pub async fn summarize(
        &self,
        from: Period,
        to: Period,
        filter: &SubscriptionFilter,
    ) -> AppResult<i64> {
        let window = BillingWindow::new(from, to)?;
        let candidates = self.subscription_service.filtered_list(filter).await?;
        let total = window.total(&candidates);

        log::debug!(
            "Summary {}..{} over {} candidates = {total}",
            window.start(),
            window.end(),
            candidates.len()
        );
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubscriptionRequest;
    use crate::services::subscription_service::tests::{memory_pool, request};
    use chrono::Utc;
    use uuid::Uuid;

    fn subscription(
        price: i64,
        start: (i32, i32),
        end: Option<(i32, i32)>,
    ) -> subscriptions::Model {
        let now = Utc::now();
        subscriptions::Model {
            id: Uuid::new_v4(),
            service_name: "Netflix".to_string(),
            price,
            user_id: Uuid::new_v4(),
            start_month: start.0,
            start_year: start.1,
            end_month: end.map(|e| e.0),
            end_year: end.map(|e| e.1),
            created_at: now,
            updated_at: now,
        }
    }

    fn window(from: (i32, i32), to: (i32, i32)) -> BillingWindow {
        BillingWindow::new(Period::new(from.0, from.1), Period::new(to.0, to.1)).unwrap()
    }

    #[test]
    fn test_full_year_window() {
        let netflix = subscription(500, (1, 2024), Some((12, 2024)));
        assert_eq!(window((1, 2024), (12, 2024)).total(&[netflix]), 6000);
    }

    #[test]
    fn test_partial_overlap_across_years() {
        let netflix = subscription(500, (1, 2024), Some((12, 2024)));
        // June..December 2024
        assert_eq!(window((6, 2024), (6, 2025)).total(&[netflix]), 3500);
    }

    #[test]
    fn test_open_ended_clips_to_window() {
        let open = subscription(300, (1, 2023), None);
        assert_eq!(window((1, 2024), (3, 2024)).accrued(&open), 900);
        // window starting before the subscription
        assert_eq!(window((11, 2022), (2, 2023)).accrued(&open), 600);
        // furthest window accepted
        assert_eq!(
            window((1, 9999), (12, 9999)).accrued(&open),
            12 * 300
        );
    }

    #[test]
    fn test_no_overlap_contributes_zero() {
        let sub = subscription(500, (3, 2024), Some((5, 2024)));
        assert_eq!(window((1, 2024), (2, 2024)).accrued(&sub), 0);
        assert_eq!(window((6, 2024), (12, 2025)).accrued(&sub), 0);
    }

    #[test]
    fn test_window_containing_subscription_charges_every_month() {
        let sub = subscription(250, (11, 2023), Some((2, 2024)));
        assert_eq!(window((1, 2020), (12, 2030)).accrued(&sub), 4 * 250);
        // single month, both bounds inclusive
        assert_eq!(window((2, 2024), (2, 2024)).accrued(&sub), 250);
    }

    #[test]
    fn test_inverted_subscription_never_matches() {
        let inverted = subscription(500, (6, 2025), Some((1, 2024)));
        assert_eq!(window((1, 2000), (12, 2100)).accrued(&inverted), 0);
    }

    #[test]
    fn test_empty_candidates_total_zero() {
        assert_eq!(window((1, 2024), (12, 2024)).total(&[]), 0);
    }

    #[test]
    fn test_sums_multiple_subscriptions() {
        let records = vec![
            subscription(500, (1, 2024), Some((12, 2024))),
            subscription(100, (6, 2024), None),
            subscription(999, (1, 2030), None),
        ];
        // 12*500 + 7*100 + 0
        assert_eq!(window((1, 2024), (12, 2024)).total(&records), 6700);
    }

    #[test]
    fn test_total_saturates() {
        let records = vec![
            subscription(i64::MAX, (1, 2024), None),
            subscription(i64::MAX, (1, 2024), None),
        ];
        assert_eq!(window((1, 2024), (12, 2024)).total(&records), i64::MAX);
    }

    #[test]
    fn test_inverted_window_is_invalid_range() {
        let err = BillingWindow::new(Period::new(3, 2024), Period::new(1, 2024)).unwrap_err();
        assert!(matches!(err, AppError::InvalidRange(_)));

        let err = BillingWindow::new(Period::new(1, 2025), Period::new(12, 2024)).unwrap_err();
        assert!(matches!(err, AppError::InvalidRange(_)));
    }

    #[tokio::test]
    async fn test_summarize_through_store() {
        let store = SubscriptionService::new(memory_pool().await);
        let summary = SummaryService::new(store.clone());
        let user_id = Uuid::new_v4();
        store.create(request("Netflix", user_id)).await.unwrap();
        store.create(request("Spotify", Uuid::new_v4())).await.unwrap();

        let from = Period::new(1, 2024);
        let to = Period::new(12, 2024);

        let all = summary
            .summarize(from, to, &SubscriptionFilter::default())
            .await
            .unwrap();
        assert_eq!(all, 12000);

        let only_user = SubscriptionFilter {
            user_id: Some(user_id),
            service_name: None,
        };
        assert_eq!(summary.summarize(from, to, &only_user).await.unwrap(), 6000);

        let no_match = SubscriptionFilter {
            user_id: Some(user_id),
            service_name: Some("spotify".to_string()),
        };
        assert_eq!(summary.summarize(from, to, &no_match).await.unwrap(), 0);
    }

    #[test]
    fn test_out_of_range_bounds_are_rejected() {
        let bounds = [
            (Period::new(1, MAX_WINDOW_YEAR), Period::new(12, MAX_WINDOW_YEAR + 1)),
            (Period::new(13, 2024), Period::new(1, 2025)),
            (Period::new(0, 2024), Period::new(3, 2024)),
            (Period::new(1, 0), Period::new(1, 2024)),
        ];
        for (from, to) in bounds {
            assert!(
                matches!(BillingWindow::new(from, to), Err(AppError::ValidationError(_))),
                "{from}..{to} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_summarize_rejects_out_of_range_window() {
        let store = SubscriptionService::new(memory_pool().await);
        let summary = SummaryService::new(store.clone());
        let open = SubscriptionRequest {
            price: 100,
            end_month: None,
            end_year: None,
            ..request("Netflix", Uuid::new_v4())
        };
        store.create(open).await.unwrap();

        let err = summary
            .summarize(
                Period::new(1, MAX_WINDOW_YEAR),
                Period::new(12, MAX_WINDOW_YEAR + 1),
                &SubscriptionFilter::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = summary
            .summarize(
                Period::new(13, 2024),
                Period::new(1, 2025),
                &SubscriptionFilter::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        // the furthest valid window still bills every month of an open-ended record
        let last_year = summary
            .summarize(
                Period::new(1, MAX_WINDOW_YEAR),
                Period::new(12, MAX_WINDOW_YEAR),
                &SubscriptionFilter::default(),
            )
            .await
            .unwrap();
        assert_eq!(last_year, 1200);
    }

    #[tokio::test]
    async fn test_summarize_rejects_inverted_window() {
        let store = SubscriptionService::new(memory_pool().await);
        let summary = SummaryService::new(store);
        let err = summary
            .summarize(
                Period::new(3, 2024),
                Period::new(1, 2024),
                &SubscriptionFilter::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRange(_)));
    }
}
