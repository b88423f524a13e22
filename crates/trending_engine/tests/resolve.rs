mod common;

use chrono::{DateTime, TimeZone, Utc};
use common::{quarter, report_page, FakeFetcher, BASE};
use pretty_assertions::assert_eq;
use trending_core::{PageSpec, Periodicity, ResolvedLocation};
use trending_engine::{
    ConfigurationError, Credentials, ExtractionError, FailureKind, Login, PageError,
    ResolutionError, Resolver,
};

const ACQ: &str = "acq_stat_reports";

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn acq() -> PageSpec {
    PageSpec::new(ACQ, BASE).with_periodicity(Periodicity::Quarterly)
}

fn perigee() -> PageSpec {
    PageSpec::new("perigee_health_plots", BASE).with_periodicity(Periodicity::Monthly)
}

fn q3_2024() -> String {
    report_page("2024-07-01T00:00:00", "2024-09-30T00:00:00")
}

async fn resolve(fetcher: &FakeFetcher, spec: &PageSpec, now: DateTime<Utc>) -> Result<ResolvedLocation, PageError> {
    let credentials = Credentials::new();
    Resolver::new(fetcher, &credentials).resolve(spec, now).await
}

#[tokio::test]
async fn fixed_pages_resolve_without_requests() {
    let fetcher = FakeFetcher::new();
    let spec = PageSpec::new("obc_rate_noise/trending", BASE);

    let location = resolve(&fetcher, &spec, at(2024, 9, 20)).await.unwrap();

    assert_eq!(location.primary(), format!("{BASE}/obc_rate_noise/trending/"));
    assert!(!location.has_distinct_current_period());
    assert!(fetcher.requests().is_empty());
}

#[tokio::test]
async fn quarter_past_midpoint_is_both_primary_and_current() {
    let fetcher = FakeFetcher::new().page(&quarter(ACQ, 2024, 3), &q3_2024());

    let location = resolve(&fetcher, &acq(), at(2024, 9, 20)).await.unwrap();

    assert_eq!(location, ResolvedLocation::fixed(quarter(ACQ, 2024, 3)));
    assert_eq!(fetcher.requested_urls(), vec![quarter(ACQ, 2024, 3)]);
}

#[tokio::test]
async fn young_quarter_reports_on_the_previous_one() {
    let fetcher = FakeFetcher::new().page(&quarter(ACQ, 2024, 3), &q3_2024());

    let location = resolve(&fetcher, &acq(), at(2024, 7, 15)).await.unwrap();

    assert_eq!(location.primary(), quarter(ACQ, 2024, 2));
    assert_eq!(location.current_period(), quarter(ACQ, 2024, 3));
}

#[tokio::test]
async fn unpublished_quarters_are_skipped() {
    let q2 = report_page("2024:092:00:00:00.000", "2024:183:00:00:00.000");
    let fetcher = FakeFetcher::new()
        .status(&quarter(ACQ, 2024, 3), 404)
        .page(&quarter(ACQ, 2024, 2), &q2);

    let location = resolve(&fetcher, &acq(), at(2024, 7, 15)).await.unwrap();

    assert_eq!(location, ResolvedLocation::fixed(quarter(ACQ, 2024, 2)));
    assert_eq!(
        fetcher.requested_urls(),
        vec![quarter(ACQ, 2024, 3), quarter(ACQ, 2024, 2)]
    );
}

#[tokio::test]
async fn young_first_quarter_falls_back_to_last_years_fourth() {
    let q1 = report_page("2025-01-01T00:00:00", "2025-04-01T00:00:00");
    let fetcher = FakeFetcher::new().page(&quarter(ACQ, 2025, 1), &q1);

    let location = resolve(&fetcher, &acq(), at(2025, 1, 10)).await.unwrap();

    assert_eq!(location.primary(), quarter(ACQ, 2024, 4));
    assert_eq!(location.current_period(), quarter(ACQ, 2025, 1));
}

#[tokio::test]
async fn probing_crosses_into_the_previous_year() {
    let q4 = report_page("2023-10-01T00:00:00", "2024-01-01T00:00:00");
    let fetcher = FakeFetcher::new().page(&quarter(ACQ, 2023, 4), &q4);

    let location = resolve(&fetcher, &acq(), at(2024, 2, 1)).await.unwrap();

    assert_eq!(location, ResolvedLocation::fixed(quarter(ACQ, 2023, 4)));
    assert_eq!(
        fetcher.requested_urls(),
        vec![quarter(ACQ, 2024, 1), quarter(ACQ, 2023, 4)]
    );
}

#[tokio::test]
async fn no_reachable_quarter_lists_every_probe() {
    let fetcher = FakeFetcher::new();

    let err = resolve(&fetcher, &acq(), at(2024, 9, 20)).await.unwrap_err();

    match err {
        PageError::Resolution(ResolutionError::NoReachablePeriod { page, probed, .. }) => {
            assert_eq!(page, ACQ);
            assert_eq!(probed.len(), 4);
            assert!(probed[0].starts_with(&quarter(ACQ, 2024, 3)));
            assert!(probed[3].starts_with(&quarter(ACQ, 2023, 4)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_while_probing_stops_resolution() {
    let fetcher = FakeFetcher::new()
        .broken(&quarter(ACQ, 2024, 3))
        .page(&quarter(ACQ, 2024, 2), &q3_2024());

    let err = resolve(&fetcher, &acq(), at(2024, 9, 20)).await.unwrap_err();

    match err {
        PageError::Fetch(fetch) => assert_eq!(fetch.kind, FailureKind::Network),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fetcher.requests().len(), 1);
}

#[tokio::test]
async fn reachable_quarter_without_period_table_is_an_extraction_error() {
    let fetcher = FakeFetcher::new().page(&quarter(ACQ, 2024, 3), "<html><table></table></html>");

    let err = resolve(&fetcher, &acq(), at(2024, 9, 20)).await.unwrap_err();

    assert!(matches!(
        err,
        PageError::Extraction(ExtractionError::MissingPeriodTable { index: 1, .. })
    ));
}

#[tokio::test]
async fn unparseable_period_start_is_reported_with_its_value() {
    let fetcher = FakeFetcher::new().page(
        &quarter(ACQ, 2024, 3),
        &report_page("sometime in july", "2024-10-01T00:00:00"),
    );

    let err = resolve(&fetcher, &acq(), at(2024, 9, 20)).await.unwrap_err();

    match err {
        PageError::Extraction(ExtractionError::BadTimestamp { column, value, .. }) => {
            assert_eq!(column, "TSTART");
            assert_eq!(value, "sometime in july");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn protected_quarters_are_probed_with_the_login() {
    let spec = acq().requiring_auth("periscope_drift_page");
    let credentials =
        Credentials::new().with_login("periscope_drift_page", Login::new("aca", "secret"));
    let fetcher = FakeFetcher::new().page(&quarter(ACQ, 2024, 3), &q3_2024());

    Resolver::new(&fetcher, &credentials)
        .resolve(&spec, at(2024, 9, 20))
        .await
        .unwrap();

    assert_eq!(
        fetcher.requests(),
        vec![(quarter(ACQ, 2024, 3), Some("aca".to_string()))]
    );
}

#[tokio::test]
async fn protected_page_without_login_is_a_configuration_error() {
    let spec = acq().requiring_auth("periscope_drift_page");
    let fetcher = FakeFetcher::new();

    let err = resolve(&fetcher, &spec, at(2024, 9, 20)).await.unwrap_err();

    assert!(matches!(
        err,
        PageError::Configuration(ConfigurationError::MissingCredential { .. })
    ));
    assert!(fetcher.requests().is_empty());
}

#[tokio::test]
async fn settled_month_is_used_after_the_fifteenth() {
    let url = format!("{BASE}/perigee_health_plots/SUMMARY_DATA/2024-M07/");
    let fetcher = FakeFetcher::new().page(&url, "<html></html>");

    let location = resolve(&fetcher, &perigee(), at(2024, 7, 20)).await.unwrap();

    assert_eq!(location, ResolvedLocation::fixed(url));
}

#[tokio::test]
async fn early_in_the_month_the_previous_month_is_used() {
    let url = format!("{BASE}/perigee_health_plots/SUMMARY_DATA/2024-M06/");
    let fetcher = FakeFetcher::new().page(&url, "<html></html>");

    let location = resolve(&fetcher, &perigee(), at(2024, 7, 10)).await.unwrap();

    assert_eq!(location.primary(), url);
}

#[tokio::test]
async fn early_january_uses_last_december() {
    let url = format!("{BASE}/perigee_health_plots/SUMMARY_DATA/2024-M12/");
    let fetcher = FakeFetcher::new().page(&url, "<html></html>");

    let location = resolve(&fetcher, &perigee(), at(2025, 1, 5)).await.unwrap();

    assert_eq!(location.primary(), url);
}

#[tokio::test]
async fn unpublished_month_is_a_resolution_error() {
    let fetcher = FakeFetcher::new();

    let err = resolve(&fetcher, &perigee(), at(2024, 7, 20)).await.unwrap_err();

    match err {
        PageError::Resolution(ResolutionError::MonthUnavailable { url, status, .. }) => {
            assert!(url.ends_with("SUMMARY_DATA/2024-M07/"));
            assert_eq!(status, 404);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn first_published_candidate_wins_across_the_probe_matrix() {
    let now = at(2024, 9, 20);
    let candidates = trending_core::Quarter::candidates(&now);
    let fmt = |t: DateTime<Utc>| t.format("%Y-%m-%dT%H:%M:%S").to_string();

    for published in 0u8..16 {
        for past_midpoint in [true, false] {
            let (start, stop) = if past_midpoint {
                (now - chrono::TimeDelta::days(60), now + chrono::TimeDelta::days(10))
            } else {
                (now - chrono::TimeDelta::days(10), now + chrono::TimeDelta::days(60))
            };
            let body = report_page(&fmt(start), &fmt(stop));
            let mut fetcher = FakeFetcher::new();
            for (i, q) in candidates.iter().enumerate() {
                if published & (1 << i) != 0 {
                    fetcher = fetcher.page(&quarter(ACQ, q.year(), q.number()), &body);
                }
            }

            let result = resolve(&fetcher, &acq(), now).await;

            let Some(first) = (0..candidates.len()).find(|i| published & (1 << i) != 0) else {
                assert!(matches!(
                    result,
                    Err(PageError::Resolution(ResolutionError::NoReachablePeriod { .. }))
                ));
                continue;
            };
            let chosen = candidates[first];
            let chosen_url = quarter(ACQ, chosen.year(), chosen.number());
            let expected = if past_midpoint {
                ResolvedLocation::fixed(chosen_url)
            } else {
                let prev = chosen.previous();
                ResolvedLocation::split(quarter(ACQ, prev.year(), prev.number()), chosen_url)
            };
            assert_eq!(
                result.unwrap(),
                expected,
                "published mask {published:04b}, past midpoint {past_midpoint}"
            );
            assert_eq!(fetcher.requests().len(), first + 1);
        }
    }
}
