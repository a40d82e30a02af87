//! Schema setup and load against an embedded DuckDB session.
//!
//! Uses a two-table schema written in portable SQL; the "copy" step seeds the
//! staging table from a parameterised VALUES list instead of object storage.

use dwh_catalog::{Phase, QueryCatalog, TableDef, TableKind, Template};
use dwh_db::{Database, DuckDbBackend};
use dwh_etl::{
    close_session, load, setup_schema, EtlError, LoadOptions, RecordingSink, StdoutSink,
};
use dwh_jinja::TemplateParams;

const SCHEMA: &[TableDef] = &[
    TableDef {
        name: "plays",
        kind: TableKind::Dimension,
        references: &["staging_plays"],
        create: Template {
            name: "create_plays.sql",
            source: "CREATE TABLE plays (user_id INTEGER, page VARCHAR)",
        },
        load: Some(Template {
            name: "insert_plays.sql",
            source: "INSERT INTO plays SELECT DISTINCT user_id, page FROM staging_plays \
                     WHERE page = 'NextSong' \
                     AND user_id NOT IN (SELECT DISTINCT user_id FROM plays)",
        }),
    },
    TableDef {
        name: "staging_plays",
        kind: TableKind::Staging,
        references: &[],
        create: Template {
            name: "create_staging_plays.sql",
            source: "CREATE TABLE staging_plays (user_id INTEGER, page VARCHAR)",
        },
        load: Some(Template {
            name: "copy_staging_plays.sql",
            source: "INSERT INTO staging_plays VALUES \
                     (1, '{{ page }}'), (1, '{{ page }}'), (2, '{{ page }}'), (3, 'Home')",
        }),
    },
];

fn catalog() -> QueryCatalog {
    let mut params = TemplateParams::new();
    params.insert("page", "NextSong");
    QueryCatalog::build(SCHEMA, params).unwrap()
}

#[tokio::test]
async fn test_setup_then_load() {
    let catalog = catalog();
    let db = DuckDbBackend::in_memory().unwrap();
    let mut sink = RecordingSink::new();

    let setup = setup_schema(&db, &catalog, &mut sink).await.unwrap();
    // staging_plays is referenced, so it is created first and dropped last
    assert_eq!(setup.create.reports[0].table, "staging_plays");
    assert_eq!(setup.drop.reports[0].table, "plays");

    let options = LoadOptions {
        report_counts: true,
        ..Default::default()
    };
    let summary = load(&db, &catalog, options, &mut sink).await.unwrap();

    assert_eq!(
        summary.phases_run(),
        vec![Phase::Staging, Phase::Final, Phase::Report]
    );
    assert_eq!(summary.staging.as_ref().unwrap().rows_affected(), 4);
    assert_eq!(summary.final_insert.as_ref().unwrap().rows_affected(), 2);

    let counts: Vec<Vec<String>> = summary
        .report
        .unwrap()
        .reports
        .into_iter()
        .flat_map(|r| r.rows.unwrap_or_default().rows)
        .collect();
    assert_eq!(
        counts,
        vec![vec!["staging_plays", "4"], vec!["plays", "2"]]
    );
}

#[tokio::test]
async fn test_setup_is_repeatable() {
    let catalog = catalog();
    let db = DuckDbBackend::in_memory().unwrap();
    let mut sink = RecordingSink::new();

    setup_schema(&db, &catalog, &mut sink).await.unwrap();
    load(&db, &catalog, LoadOptions::default(), &mut sink)
        .await
        .unwrap();

    // the second setup drops the loaded tables and recreates them empty
    setup_schema(&db, &catalog, &mut sink).await.unwrap();
    let rows = db.query_rows("SELECT COUNT(*) FROM plays").await.unwrap();
    assert_eq!(rows.rows, vec![vec!["0"]]);
}

#[tokio::test]
async fn test_load_without_schema_fails_and_closes() {
    let catalog = catalog();
    let db = DuckDbBackend::in_memory().unwrap();
    let mut out = StdoutSink::new(Vec::new());

    let err = close_session(
        &db,
        load(&db, &catalog, LoadOptions::default(), &mut out),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        EtlError::StatementFailed {
            phase: Phase::Staging,
            position: 1,
            ..
        }
    ));

    let printed = String::from_utf8(out.into_inner()).unwrap();
    assert!(printed.contains("Running query [staging 1/1] staging_plays:"));
    assert!(printed.contains("  ✗ staging_plays (copy)"));

    // the session is gone after close_session
    assert!(db.execute("SELECT 1").await.is_err());
}
