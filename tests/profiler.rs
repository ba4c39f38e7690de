use anyhow::Result;
use chrono::NaiveDate;
use ironprofile::testing::{sample_rows, sample_schema};
use ironprofile::{
    ColumnKind, ColumnValue, MetricType, ProfileError, Profiler, ProfilerConfig, RankedEntry, Row,
    Schema,
};

fn top(entries: &[RankedEntry<ColumnValue>]) -> Vec<(ColumnValue, i64)> {
    entries.iter().map(|e| (e.value.clone(), e.count)).collect()
}

#[test]
fn sequential_profile_of_sample() -> Result<()> {
    let profiler = Profiler::new(ProfilerConfig::default().sequential())?;
    let report = profiler.profile(&sample_schema(), sample_rows())?;
    assert_eq!(report.row_count, 10);
    assert_eq!(report.columns.len(), 4);

    let animal = report.column("animal").expect("animal");
    assert_eq!(animal.total_count, 10);
    assert_eq!(animal.null_count, 2);
    assert_eq!(animal.empty_count, 1);
    assert_eq!(animal.unique_count, 3);
    assert!(animal.unique_count_exact);
    assert_eq!(
        top(&animal.top_values),
        vec![
            (ColumnValue::from("dog"), 4),
            (ColumnValue::from("cat"), 3),
            (ColumnValue::Null, 2),
        ]
    );
    assert_eq!(animal.min, Some(ColumnValue::from("")));
    assert_eq!(animal.max, Some(ColumnValue::from("dog")));
    let strings = animal.strings.as_ref().expect("string stats");
    assert_eq!((strings.min_length, strings.max_length), (0, 3));
    assert_eq!(strings.shortest, "");
    assert_eq!(strings.longest, "dog");
    assert!(animal.numeric.is_none());
    assert!((animal.perc_null() - 20.0).abs() < 1e-9);
    assert!((animal.perc_duplicate() - 50.0).abs() < 1e-9);

    let id = report.column("id").expect("id");
    let m = id.numeric.expect("numeric stats");
    assert_eq!(m.count, 10);
    assert!((m.sum - 55.0).abs() < 1e-9);
    assert!((m.mean - 5.5).abs() < 1e-9);
    assert!((m.variance - 8.25).abs() < 1e-9);
    assert_eq!(id.min, Some(ColumnValue::Int(1)));
    assert_eq!(id.max, Some(ColumnValue::Int(10)));
    // all counts tie at 1; the first three seen are kept
    assert_eq!(
        top(&id.top_values),
        vec![
            (ColumnValue::Int(1), 1),
            (ColumnValue::Int(2), 1),
            (ColumnValue::Int(3), 1),
        ]
    );

    let weight = report.column("weight").expect("weight");
    assert_eq!(weight.null_count, 2);
    let m = weight.numeric.expect("numeric stats");
    assert_eq!(m.count, 8);
    assert!((m.sum - 80.0).abs() < 1e-9);
    assert!((m.mean - 10.0).abs() < 1e-9);
    assert_eq!(weight.min, Some(ColumnValue::from(1.0)));
    assert_eq!(weight.max, Some(ColumnValue::from(30.0)));

    let tame = report.column("tame").expect("tame");
    let b = tame.booleans.expect("boolean stats");
    assert_eq!((b.true_count, b.false_count), (6, 3));
    assert_eq!(tame.null_count, 1);
    assert_eq!(
        top(&tame.top_values),
        vec![
            (ColumnValue::Bool(true), 6),
            (ColumnValue::Bool(false), 3),
            (ColumnValue::Null, 1),
        ]
    );
    Ok(())
}

#[test]
fn parallel_profile_matches_sequential_with_room_for_every_value() -> Result<()> {
    let seq = Profiler::new(ProfilerConfig::default().with_top_n(16).sequential())?
        .profile(&sample_schema(), sample_rows())?;
    let par = Profiler::new(
        ProfilerConfig::default()
            .with_top_n(16)
            .with_partitions(3)
            .with_fanout(2),
    )?
    .profile(&sample_schema(), sample_rows())?;

    for name in ["animal", "tame"] {
        let (s, p) = (seq.column(name).expect(name), par.column(name).expect(name));
        assert_eq!(s.top_values, p.top_values, "{name}");
    }
    for (s, p) in seq.columns.iter().zip(&par.columns) {
        assert_eq!(s.total_count, p.total_count);
        assert_eq!(s.null_count, p.null_count);
        assert_eq!(s.unique_count, p.unique_count);
        assert_eq!(s.min, p.min);
        assert_eq!(s.max, p.max);
        assert_eq!(s.strings, p.strings);
        assert_eq!(s.booleans, p.booleans);
        match (s.numeric, p.numeric) {
            (Some(a), Some(b)) => {
                assert_eq!(a.count, b.count);
                assert!((a.mean - b.mean).abs() < 1e-9);
                assert!((a.variance - b.variance).abs() < 1e-9);
            }
            (a, b) => assert_eq!(a.is_none(), b.is_none()),
        }
    }
    Ok(())
}

#[test]
fn wrong_arity_row_is_rejected() -> Result<()> {
    let mut rows = sample_rows();
    rows[2].pop();
    let err = Profiler::new(ProfilerConfig::default())?
        .profile(&sample_schema(), rows)
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<ProfileError>(),
        Some(&ProfileError::SchemaMismatch {
            row: 2,
            expected: 4,
            found: 3
        })
    );
    Ok(())
}

#[test]
fn invalid_settings_are_rejected() {
    assert_eq!(
        Profiler::new(ProfilerConfig::default().with_top_n(0)).unwrap_err(),
        ProfileError::InvalidCapacity(0)
    );
    assert!(matches!(
        Profiler::new(ProfilerConfig::default().with_fanout(1)),
        Err(ProfileError::InvalidConfig(_))
    ));
}

#[test]
fn partials_scanned_separately_combine_into_a_report() -> Result<()> {
    let profiler = Profiler::new(ProfilerConfig::default())?;
    let schema = sample_schema();
    let rows = sample_rows();
    let left = profiler.scan_partition(&schema, &rows[..5])?;
    let right = profiler.scan_partition(&schema, &rows[5..])?;

    let report = profiler.combine_partials(&schema, vec![left, right])?;
    assert_eq!(report.row_count, 10);
    let animal = report.column("animal").expect("animal");
    assert_eq!(animal.null_count, 2);
    assert_eq!(animal.unique_count, 3);
    assert_eq!(animal.top_values[0].value, ColumnValue::from("dog"));
    assert_eq!(animal.top_values[0].count, 4);
    Ok(())
}

#[test]
fn partials_must_match_the_schema() -> Result<()> {
    let profiler = Profiler::new(ProfilerConfig::default())?;
    let other = Schema::default()
        .with_column("id", ColumnKind::String)
        .with_column("animal", ColumnKind::String)
        .with_column("weight", ColumnKind::Float)
        .with_column("tame", ColumnKind::Boolean);
    let rows: Vec<_> = sample_rows()
        .into_iter()
        .map(|mut r| {
            r[0] = ColumnValue::from(r[0].to_string());
            r
        })
        .collect();
    let partial = profiler.scan_partition(&other, &rows)?;

    let err = profiler
        .combine_partials(&sample_schema(), vec![partial])
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ProfileError>(),
        Some(ProfileError::InvalidConfig(_))
    ));
    Ok(())
}

#[test]
fn no_rows_gives_empty_columns() -> Result<()> {
    let profiler = Profiler::new(ProfilerConfig::default())?;
    let report = profiler.profile(&sample_schema(), Vec::new())?;
    assert_eq!(report.row_count, 0);
    assert_eq!(report.columns.len(), 4);
    for col in &report.columns {
        assert_eq!(col.total_count, 0);
        assert!(col.top_values.is_empty());
        assert!(col.min.is_none());
        assert!(col.numeric.is_none());
    }

    let combined = profiler.combine_partials(&sample_schema(), Vec::new())?;
    assert_eq!(combined.row_count, 0);
    assert_eq!(combined.columns.len(), 4);
    Ok(())
}

#[test]
fn metric_rows_carry_rendered_top_values() -> Result<()> {
    let profiler = Profiler::new(ProfilerConfig::default().sequential())?;
    let report = profiler.profile(&sample_schema(), sample_rows())?;
    let rows = report.metric_rows(&profiler.config().format);

    let top_n = rows
        .iter()
        .find(|r| r.column == "animal" && r.metric == MetricType::TopNValues)
        .expect("TOP_N_VALUES row");
    assert_eq!(top_n.value, "1^Adog^A4^B2^Acat^A3^B3^Anull^A2^B");

    let true_count = rows
        .iter()
        .find(|r| r.column == "tame" && r.metric == MetricType::TrueCount)
        .expect("TRUE_COUNT row");
    assert_eq!(true_count.value, "6");
    assert!(
        rows.iter()
            .filter(|r| r.column == "tame")
            .all(|r| r.metric != MetricType::Mean)
    );
    Ok(())
}

#[test]
fn partials_must_match_the_configured_top_n() -> Result<()> {
    let schema = sample_schema();
    let rows = sample_rows();
    let worker = Profiler::new(ProfilerConfig::default().with_top_n(5))?;
    let left = worker.scan_partition(&schema, &rows[..5])?;
    let right = worker.scan_partition(&schema, &rows[5..])?;

    let coordinator = Profiler::new(ProfilerConfig::default().with_top_n(3))?;
    let expected = ProfileError::CapacityMismatch { left: 3, right: 5 };
    let err = coordinator
        .combine_partials(&schema, vec![left.clone(), right])
        .unwrap_err();
    assert_eq!(err.downcast_ref::<ProfileError>(), Some(&expected));

    // a single partial never reaches a merge
    let err = coordinator.combine_partials(&schema, vec![left]).unwrap_err();
    assert_eq!(err.downcast_ref::<ProfileError>(), Some(&expected));
    Ok(())
}

#[test]
fn cells_must_fit_their_column_kind() -> Result<()> {
    let profiler = Profiler::new(ProfilerConfig::default())?;
    let mut rows = sample_rows();
    rows[6][0] = ColumnValue::from("seven");
    let expected = ProfileError::ParseValue {
        column: "id".into(),
        kind: "integer",
        raw: "seven".into(),
    };

    let err = profiler.profile(&sample_schema(), rows.clone()).unwrap_err();
    assert_eq!(err.downcast_ref::<ProfileError>(), Some(&expected));
    assert_eq!(
        profiler.scan_partition(&sample_schema(), &rows[5..]).unwrap_err(),
        expected
    );
    Ok(())
}

#[test]
fn date_columns_order_by_calendar() -> Result<()> {
    let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).expect("valid date");
    let schema = Schema::default()
        .with_column("joindate", ColumnKind::Date)
        .with_column("lastlogin", ColumnKind::Timestamp);
    let rows: Vec<Row> = vec![
        vec![d(2011, 8, 8).into(), d(2016, 1, 14).and_hms_opt(14, 20, 20).into()],
        vec![d(1975, 4, 4).into(), d(2007, 3, 16).and_hms_opt(8, 24, 31).into()],
        vec![ColumnValue::Null, d(2007, 3, 16).and_hms_opt(8, 24, 37).into()],
        vec![d(2011, 8, 8).into(), ColumnValue::Null],
    ];

    for config in [
        ProfilerConfig::default().sequential(),
        ProfilerConfig::default().with_partitions(2),
    ] {
        let report = Profiler::new(config)?.profile(&schema, rows.clone())?;
        let join = report.column("joindate").expect("joindate");
        assert_eq!(join.min, Some(ColumnValue::Date(d(1975, 4, 4))));
        assert_eq!(join.max, Some(ColumnValue::Date(d(2011, 8, 8))));
        assert_eq!(join.unique_count, 2);
        assert_eq!(join.top_values[0].value, ColumnValue::Date(d(2011, 8, 8)));
        assert_eq!(join.top_values[0].count, 2);

        let login = report.column("lastlogin").expect("lastlogin");
        assert_eq!(login.null_count, 1);
        assert_eq!(login.min, d(2007, 3, 16).and_hms_opt(8, 24, 31).map(ColumnValue::from));
        assert_eq!(login.max, d(2016, 1, 14).and_hms_opt(14, 20, 20).map(ColumnValue::from));
        assert!(login.numeric.is_none());
    }
    Ok(())
}
