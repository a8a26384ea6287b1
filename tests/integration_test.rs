//! Integration tests for the periodize → simulate pipeline.
//!
//! Tests cover:
//! - Full pipeline with a mock price source (no files, no database)
//! - Pipeline through the CSV adapter and the SQLite store, with identical results
//! - Error propagation from the price source and the core
//! - Properties of periodization and accumulation (proptest)

mod common;

use approx::assert_relative_eq;
use chrono::NaiveDate;
use common::*;
use dcasim::domain::error::DcaError;
use dcasim::domain::period::{Interval, PeriodUnit};
use dcasim::domain::periodize::periodize;
use dcasim::domain::request::SimulationRequest;
use dcasim::domain::simulation::simulate_dca;
use dcasim::pipeline::run_simulation;

fn parse(d: &str) -> NaiveDate {
    NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()
}

fn request(symbol: &str, start: &str, end: &str, amount: f64) -> SimulationRequest {
    SimulationRequest {
        symbol: symbol.to_string(),
        start_date: parse(start),
        end_date: parse(end),
        interval: Interval::Daily,
        period: PeriodUnit::Month,
        amount,
    }
}

mod full_pipeline {
    use super::*;

    #[test]
    fn scenario_from_periodized_series() {
        let result = simulate_dca(&scenario_series(), 1000.0).unwrap();

        let units: Vec<f64> = result.steps().iter().map(|s| s.units_purchased).collect();
        let cumulative_units: Vec<f64> =
            result.steps().iter().map(|s| s.cumulative_units).collect();
        assert_eq!(units, vec![10.0, 5.0, 10.0]);
        assert_eq!(cumulative_units, vec![10.0, 15.0, 25.0]);
        assert_eq!(result.invested_series(), vec![1000.0, 2000.0, 3000.0]);
        assert_eq!(result.value_series(), vec![1000.0, 3000.0, 2500.0]);

        assert_eq!(result.final_portfolio_value(), 2500.0);
        assert_eq!(result.total_invested(), 3000.0);
        assert_eq!(result.total_profit(), -500.0);
    }

    #[test]
    fn daily_data_invests_on_first_trading_day_of_month() {
        let mut prices = vec![
            point("2023-01-03", 100.0),
            point("2023-01-04", 101.0),
            point("2023-01-31", 120.0),
            point("2023-02-01", 200.0),
            point("2023-02-15", 210.0),
            point("2023-03-01", 100.0),
            point("2023-03-31", 80.0),
        ];
        prices.push(point("2023-04-03", 50.0));
        let port = MockPriceDataPort::new().with_prices("SPY", prices);

        let run = run_simulation(&port, &request("SPY", "2023-01-01", "2023-04-01", 1000.0))
            .unwrap();

        assert_eq!(run.source_points, 7);
        assert_eq!(
            run.result.dates(),
            vec![date(2023, 1, 3), date(2023, 2, 1), date(2023, 3, 1)]
        );
        assert_eq!(run.result.final_portfolio_value(), 2500.0);
        assert_eq!(run.result.total_profit(), -500.0);
    }

    #[test]
    fn quarterly_period_contributes_four_times_a_year() {
        let prices = generate_daily("2022-01-01", 365, 50.0, 0.1);
        let port = MockPriceDataPort::new().with_prices("VTI", prices);
        let mut req = request("VTI", "2022-01-01", "2023-01-01", 500.0);
        req.period = PeriodUnit::Quarter;

        let run = run_simulation(&port, &req).unwrap();

        assert_eq!(
            run.result.dates(),
            vec![
                date(2022, 1, 1),
                date(2022, 4, 1),
                date(2022, 7, 1),
                date(2022, 10, 1)
            ]
        );
        assert_eq!(run.result.total_invested(), 2000.0);
        assert!(run.result.total_profit() > 0.0);
    }

    #[test]
    fn weekly_interval_then_monthly_period() {
        let prices = generate_daily("2023-01-01", 90, 10.0, 0.0);
        let port = MockPriceDataPort::new().with_prices("FLAT", prices);
        let mut req = request("FLAT", "2023-01-01", "2023-04-01", 100.0);
        req.interval = Interval::Weekly;

        let run = run_simulation(&port, &req).unwrap();

        // 2023-01-01 is a Sunday, so it opens its own ISO week.
        assert!(run.source_points >= 13);
        assert_eq!(run.result.steps().len(), 3);
        assert_eq!(run.result.dates()[0], date(2023, 1, 1));
        assert_eq!(run.result.total_profit(), 0.0);
    }

    #[test]
    fn single_period_boundary() {
        let port = MockPriceDataPort::new().with_prices("ONE", vec![point("2023-05-10", 3.0)]);
        let run = run_simulation(&port, &request("ONE", "2023-05-01", "2023-06-01", 100.0))
            .unwrap();

        assert_eq!(run.result.total_invested(), 100.0);
        assert_eq!(run.result.final_portfolio_value(), 100.0);
        assert_eq!(run.result.total_profit(), 0.0);
        assert_relative_eq!(run.result.total_units(), 100.0 / 3.0);
    }
}

mod errors {
    use super::*;

    #[test]
    fn unknown_symbol_is_empty_series() {
        let port = MockPriceDataPort::new().with_prices("SPY", scenario_series());
        let err = run_simulation(&port, &request("NOPE", "2023-01-01", "2023-04-01", 100.0))
            .unwrap_err();
        assert!(matches!(err, DcaError::EmptySeries));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn provider_failure_propagates_unchanged() {
        let port = MockPriceDataPort::new().with_error("SPY", "connection refused");
        let err = run_simulation(&port, &request("SPY", "2023-01-01", "2023-04-01", 100.0))
            .unwrap_err();
        match err {
            DcaError::Database { reason } => assert_eq!(reason, "connection refused"),
            other => panic!("expected Database error, got {other:?}"),
        }
    }

    #[test]
    fn amount_checked_before_series() {
        let port = MockPriceDataPort::new();
        let err = run_simulation(&port, &request("SPY", "2023-01-01", "2023-04-01", 0.0))
            .unwrap_err();
        assert!(matches!(err, DcaError::InvalidAmount { .. }));
    }

    #[test]
    fn negative_price_rejects_whole_run() {
        let port = MockPriceDataPort::new().with_prices(
            "BAD",
            vec![point("2023-01-03", 100.0), point("2023-02-01", -1.0)],
        );
        let err = run_simulation(&port, &request("BAD", "2023-01-01", "2023-04-01", 100.0))
            .unwrap_err();
        assert!(matches!(err, DcaError::InvalidPrice { price, .. } if price == -1.0));
    }

    #[test]
    fn direct_core_errors() {
        assert!(matches!(
            simulate_dca(&[], 100.0),
            Err(DcaError::EmptySeries)
        ));
        assert!(matches!(
            simulate_dca(&scenario_series(), 0.0),
            Err(DcaError::InvalidAmount { .. })
        ));
        assert!(matches!(
            simulate_dca(&[point("2023-01-01", 0.0)], 100.0),
            Err(DcaError::InvalidPrice { .. })
        ));
        assert!(matches!(
            periodize(&[], PeriodUnit::Month),
            Err(DcaError::EmptySeries)
        ));
    }
}

mod adapters {
    use super::*;
    use dcasim::adapters::csv_adapter::CsvAdapter;
    use dcasim::ports::data_port::PriceDataPort;
    use std::fs;

    fn prices() -> Vec<PricePoint> {
        generate_daily("2023-01-01", 120, 100.0, -0.25)
    }

    #[test]
    fn pipeline_through_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("SPY.csv"), csv_file_content(&prices())).unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let run = run_simulation(&adapter, &request("SPY", "2023-01-01", "2023-04-01", 1000.0))
            .unwrap();

        assert_eq!(run.source_points, 90);
        assert_eq!(run.result.steps().len(), 3);
        assert_eq!(run.result.total_invested(), 3000.0);
        assert!(run.result.total_profit() < 0.0);
    }

    #[test]
    fn every_listed_csv_symbol_simulates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("spy.csv"), csv_file_content(&prices())).unwrap();
        fs::write(dir.path().join("Qqq.csv"), csv_file_content(&prices())).unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let listed = adapter.list_symbols().unwrap();
        assert_eq!(listed, vec!["QQQ", "SPY"]);
        for symbol in &listed {
            let run = run_simulation(&adapter, &request(symbol, "2023-01-01", "2023-04-01", 1000.0))
                .unwrap();
            assert_eq!(run.result.steps().len(), 3, "{symbol}");
        }
    }

    #[test]
    fn traversal_symbol_is_rejected_before_reading() {
        let root = tempfile::tempdir().unwrap();
        let data = root.path().join("data");
        fs::create_dir(&data).unwrap();
        fs::write(root.path().join("SECRET.csv"), csv_file_content(&prices())).unwrap();
        let adapter = CsvAdapter::new(data);

        let err = run_simulation(
            &adapter,
            &request("../SECRET", "2023-01-01", "2023-04-01", 1000.0),
        )
        .unwrap_err();
        assert!(matches!(err, DcaError::ConfigInvalid { ref key, .. } if key == "symbol"));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn csv_and_sqlite_sources_agree() {
        use dcasim::adapters::sqlite_adapter::SqliteAdapter;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("SPY.csv"), csv_file_content(&prices())).unwrap();
        let csv = CsvAdapter::new(dir.path().to_path_buf());

        let sqlite = SqliteAdapter::in_memory().unwrap();
        sqlite.initialize_schema().unwrap();
        sqlite.insert_prices("SPY", &prices()).unwrap();

        let req = request("SPY", "2023-01-15", "2023-04-15", 250.0);
        let from_csv = run_simulation(&csv, &req).unwrap();
        let from_sqlite = run_simulation(&sqlite, &req).unwrap();

        assert_eq!(from_csv.periodized, from_sqlite.periodized);
        assert_eq!(from_csv.result, from_sqlite.result);
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;
    use std::collections::{BTreeMap, HashSet};

    /// Sorted series with unique dates spread over roughly three years.
    fn series_strategy() -> impl Strategy<Value = Vec<PricePoint>> {
        prop::collection::vec((0i64..1100, 1.0f64..1000.0), 1..80).prop_map(|raw| {
            let unique: BTreeMap<i64, f64> = raw.into_iter().collect();
            unique
                .into_iter()
                .map(|(offset, price)| {
                    PricePoint::new(date(2021, 1, 1) + chrono::Duration::days(offset), price)
                })
                .collect()
        })
    }

    fn unit_strategy() -> impl Strategy<Value = PeriodUnit> {
        prop_oneof![
            Just(PeriodUnit::Day),
            Just(PeriodUnit::Week),
            Just(PeriodUnit::Month),
            Just(PeriodUnit::Quarter),
            Just(PeriodUnit::Year),
        ]
    }

    proptest! {
        #[test]
        fn periodize_keeps_earliest_point_per_period(
            series in series_strategy(),
            unit in unit_strategy(),
        ) {
            let out = periodize(&series, unit).unwrap();
            let distinct: HashSet<_> = series.iter().map(|p| unit.key(p.date)).collect();

            prop_assert_eq!(out.len(), distinct.len());
            for kept in &out {
                prop_assert!(series.contains(kept));
                let key = unit.key(kept.date);
                let earliest = series.iter().find(|p| unit.key(p.date) == key).unwrap();
                prop_assert_eq!(kept, earliest);
            }
            for pair in out.windows(2) {
                prop_assert!(pair[0].date < pair[1].date);
            }
        }

        #[test]
        fn invested_grows_by_exactly_the_amount(
            series in series_strategy(),
            amount in 1u32..10_000,
        ) {
            let amount = f64::from(amount);
            let result = simulate_dca(&series, amount).unwrap();
            let steps = result.steps();

            prop_assert_eq!(steps.len(), series.len());
            prop_assert_eq!(steps[0].cumulative_invested, amount);
            for pair in steps.windows(2) {
                prop_assert_eq!(pair[1].cumulative_invested - pair[0].cumulative_invested, amount);
            }
            prop_assert_eq!(result.total_invested(), amount * series.len() as f64);
        }

        #[test]
        fn units_never_decrease(series in series_strategy(), amount in 0.01f64..50_000.0) {
            let result = simulate_dca(&series, amount).unwrap();
            for pair in result.steps().windows(2) {
                prop_assert!(pair[1].cumulative_units >= pair[0].cumulative_units);
            }
        }

        #[test]
        fn simulation_is_deterministic(series in series_strategy(), amount in 0.01f64..50_000.0) {
            let first = simulate_dca(&series, amount).unwrap();
            let second = simulate_dca(&series, amount).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn profit_is_rounded_difference_of_rounded_totals(
            series in series_strategy(),
            amount in 0.01f64..50_000.0,
        ) {
            let result = simulate_dca(&series, amount).unwrap();
            let summary = result.summary();
            let expected = dcasim::domain::rounding::round2(
                summary.final_portfolio_value - summary.total_invested,
            );
            prop_assert_eq!(summary.total_profit, expected);
        }
    }
}
