//! Integration tests for the multi-year fetch pipeline and result cache

mod common;

use common::{date, test_config, FakeDatastore, SqlBehavior, RESOURCE_2021};
use powermap::adapters::aneel::{OutageSource, YearResourceMap};
use powermap::core::cache::ManualClock;
use powermap::core::fetch::{
    build_orchestrator, MonthFetcher, OutageQuery, YearFallback, YearQueryExecutor,
};
use powermap::core::service::{OutageService, SearchParams};
use powermap::domain::dates::{display_sort_key, parse_record_date};
use powermap::domain::{OutageRecord, PowerMapError, SearchMode, YearMeta};
use std::sync::Arc;
use test_case::test_case;

fn service_over(source: Arc<FakeDatastore>, clock: Arc<ManualClock>) -> OutageService {
    OutageService::with_source(source, &test_config(), clock).unwrap()
}

fn sorted(mut rows: Vec<OutageRecord>) -> Vec<OutageRecord> {
    rows.sort_by(|a, b| {
        a.start_timestamp
            .cmp(&b.start_timestamp)
            .then_with(|| a.order_number.cmp(&b.order_number))
    });
    rows
}

#[tokio::test]
async fn test_january_2021_unit_scenario() {
    let source = Arc::new(FakeDatastore::new());
    let orchestrator = build_orchestrator(
        source,
        YearResourceMap::from_config(&test_config().aneel.resources).unwrap(),
        &test_config(),
    );

    let query = OutageQuery::new(date(2021, 1, 1), date(2021, 1, 31), None, SearchMode::Unit);
    let result = orchestrator.fetch(&query).await.unwrap();

    assert_eq!(result.metas, vec![YearMeta::new(2021, result.rows.len())]);
    assert!(!result.rows.is_empty());
    for row in &result.rows {
        assert!(row.start_timestamp.starts_with("2021-01-"));
        assert!(row.consumer_unit_number().is_some());
        assert!(row.company_name().is_none());
    }

    let json = serde_json::to_value(&result.rows[0]).unwrap();
    assert!(json.get("NumUnidadeConsumidora").is_some());
    assert!(json.get("NomAgenteRegulado").is_none());
}

#[tokio::test]
async fn test_single_year_equals_executor_output() {
    let config = test_config();
    let resources = YearResourceMap::from_config(&config.aneel.resources).unwrap();
    let source: Arc<dyn OutageSource> = Arc::new(FakeDatastore::new());

    let query = OutageQuery::new(
        date(2021, 3, 5),
        date(2021, 11, 20),
        Some("light"),
        SearchMode::Company,
    );
    let merged = build_orchestrator(source.clone(), resources.clone(), &config)
        .fetch(&query)
        .await
        .unwrap();

    let executor = YearQueryExecutor::new(
        source.clone(),
        resources,
        config.query.page_size,
        YearFallback::new(MonthFetcher::new(source, config.fallback.clone())),
    );
    let (mut rows, meta) = executor
        .execute(2021, query.start, query.end, query.term.as_deref(), query.mode)
        .await
        .unwrap();
    rows.sort_by_cached_key(|r| display_sort_key(&r.day));

    assert_eq!(merged.rows, rows);
    assert_eq!(merged.metas, vec![meta]);
    assert!(rows.len() > 10);
    assert!(rows.iter().all(|r| r.company_abbreviation() == Some("LIGHT")));
}

#[tokio::test]
async fn test_multi_year_merge_is_sorted_with_ordered_metas() {
    let source = Arc::new(FakeDatastore::new());
    let service = service_over(source, Arc::new(ManualClock::default()));

    let query = OutageQuery::new(
        date(2020, 11, 1),
        date(2022, 2, 28),
        None,
        SearchMode::Company,
    );
    let result = service.fetch(&query).await.unwrap();

    let years: Vec<i32> = result.metas.iter().map(|m| m.year).collect();
    assert_eq!(years, vec![2020, 2021, 2022]);
    let total: usize = result.metas.iter().map(|m| m.total_count_for_year).sum();
    assert_eq!(total, result.rows.len());
    assert!(result.metas.iter().all(|m| m.total_count_for_year > 0));

    let days: Vec<_> = result
        .rows
        .iter()
        .map(|r| parse_record_date(&r.start_timestamp).unwrap())
        .collect();
    assert!(days.windows(2).all(|w| w[0] <= w[1]));
    assert!(days[0] >= date(2020, 11, 1));
    assert!(*days.last().unwrap() <= date(2022, 2, 28));
}

#[tokio::test]
async fn test_years_without_resource_report_zero() {
    let mut config = test_config();
    config.aneel.resources.retain(|year, _| year.as_str() == "2021");
    let source = Arc::new(FakeDatastore::new());
    let service =
        OutageService::with_source(source, &config, Arc::new(ManualClock::default())).unwrap();

    let query = OutageQuery::new(
        date(2020, 12, 1),
        date(2021, 1, 15),
        None,
        SearchMode::Unit,
    );
    let result = service.fetch(&query).await.unwrap();

    assert_eq!(result.metas[0], YearMeta::new(2020, 0));
    assert_eq!(result.metas[1].year, 2021);
    assert!(result
        .rows
        .iter()
        .all(|r| r.start_timestamp.starts_with("2021-01-")));
}

#[test_case(SqlBehavior::Forbidden ; "forbidden payload")]
#[test_case(SqlBehavior::Denied ; "http 403")]
#[tokio::test]
async fn test_fallback_matches_structured_path(behavior: SqlBehavior) {
    let query = OutageQuery::new(
        date(2021, 2, 10),
        date(2021, 5, 20),
        Some("cemig"),
        SearchMode::Company,
    );

    let structured = service_over(
        Arc::new(FakeDatastore::new()),
        Arc::new(ManualClock::default()),
    )
    .fetch(&query)
    .await
    .unwrap();

    let denied_source = Arc::new(FakeDatastore::new().with_behavior(RESOURCE_2021, behavior));
    let fallback = service_over(denied_source.clone(), Arc::new(ManualClock::default()))
        .fetch(&query)
        .await
        .unwrap();

    assert!(denied_source
        .search_calls
        .load(std::sync::atomic::Ordering::SeqCst)
        >= 4);
    assert_eq!(
        sorted(fallback.rows.to_vec()),
        sorted(structured.rows.to_vec())
    );
    assert_eq!(fallback.metas, structured.metas);

    for row in fallback.rows.iter() {
        let day = parse_record_date(&row.start_timestamp).unwrap();
        assert!(date(2021, 2, 10) <= day && day <= date(2021, 5, 20));
        let name = row.company_name().unwrap_or_default().to_lowercase();
        let abbreviation = row.company_abbreviation().unwrap_or_default().to_lowercase();
        assert!(name.contains("cemig") || abbreviation.contains("cemig"));
    }
}

#[tokio::test]
async fn test_fallback_survives_transient_timeouts() {
    let query = OutageQuery::new(date(2021, 1, 1), date(2021, 3, 31), None, SearchMode::Unit);

    let expected = service_over(
        Arc::new(FakeDatastore::new()),
        Arc::new(ManualClock::default()),
    )
    .fetch(&query)
    .await
    .unwrap();

    let flaky = Arc::new(
        FakeDatastore::new()
            .with_behavior(RESOURCE_2021, SqlBehavior::Forbidden)
            .with_search_timeouts(3),
    );
    let result = service_over(flaky, Arc::new(ManualClock::default()))
        .fetch(&query)
        .await
        .unwrap();

    assert_eq!(
        sorted(result.rows.to_vec()),
        sorted(expected.rows.to_vec())
    );
}

#[tokio::test]
async fn test_fatal_year_fails_whole_search_and_caches_nothing() {
    let source = Arc::new(FakeDatastore::new().with_behavior(RESOURCE_2021, SqlBehavior::Broken));
    let service = service_over(source, Arc::new(ManualClock::default()));

    let query = OutageQuery::new(
        date(2020, 6, 1),
        date(2022, 6, 1),
        None,
        SearchMode::Company,
    );
    let err = service.fetch(&query).await.unwrap_err();

    assert!(matches!(err, PowerMapError::Upstream(_)));
    assert!(service.cache().is_empty().await);
}

#[tokio::test]
async fn test_start_after_end_is_rejected_before_fetch() {
    let source = Arc::new(FakeDatastore::new());
    let service = service_over(source.clone(), Arc::new(ManualClock::default()));

    let query = OutageQuery::new(date(2021, 2, 1), date(2021, 1, 1), None, SearchMode::Unit);
    let err = service.fetch(&query).await.unwrap_err();

    assert!(err.is_client_error());
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_cache_hit_and_expiry() {
    let source = Arc::new(FakeDatastore::new());
    let clock = Arc::new(ManualClock::default());
    let service = service_over(source.clone(), clock.clone());

    let first = OutageQuery::new(
        date(2021, 1, 1),
        date(2021, 1, 31),
        Some("  CEMIG"),
        SearchMode::Company,
    );
    let second = OutageQuery::new(
        date(2021, 1, 1),
        date(2021, 1, 31),
        Some("cemig"),
        SearchMode::Company,
    );

    let fresh = service.search(SearchParams::new(first.clone())).await.unwrap();
    let calls = source.calls();
    assert!(calls > 0);

    let cached = service.search(SearchParams::new(second)).await.unwrap();
    assert_eq!(source.calls(), calls);
    assert_eq!(cached.data, fresh.data);
    assert_eq!(cached.meta.years, fresh.meta.years);
    assert_ne!(cached.meta.request_id, fresh.meta.request_id);

    clock.advance(chrono::Duration::seconds(1200));
    service.search(SearchParams::new(first)).await.unwrap();
    assert!(source.calls() > calls);
    assert_eq!(service.cache().len().await, 1);
}
