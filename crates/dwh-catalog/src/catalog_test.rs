use super::*;
use crate::tables::Template;

fn config_yaml(extra_s3: &str) -> String {
    format!(
        r#"
CLUSTER:
  HOST: localhost
  DB_NAME: dev
  DB_USER: awsuser
  DB_PASSWORD: secret
  DB_PORT: 5439
IAM_ROLE:
  ARN: arn:aws:iam::123:role/x
S3:
  LOG_DATA: s3://bucket/logs
  LOG_JSONPATH: s3://bucket/log_json_path.json
  SONG_DATA: s3://bucket/songs
{extra_s3}"#
    )
}

fn catalog() -> QueryCatalog {
    let config = Config::from_yaml(&config_yaml("")).unwrap();
    QueryCatalog::new(&config).unwrap()
}

fn tables(statements: &[Statement]) -> Vec<&str> {
    statements.iter().map(|s| s.table()).collect()
}

fn assert_fully_rendered(statement: &Statement) {
    for marker in ["{{", "}}", "{%", "%}"] {
        assert!(
            !statement.sql().contains(marker),
            "unrendered template marker {marker} in {}",
            statement.sql()
        );
    }
}

#[test]
fn test_staging_events_copy_embeds_configuration() {
    let catalog = catalog();
    let copy = &catalog.staging_load_statements()[0];

    assert_eq!(copy.table(), "staging_events");
    assert_eq!(copy.kind(), StatementKind::Copy);
    assert!(copy.sql().contains("s3://bucket/logs"));
    assert!(copy.sql().contains("arn:aws:iam::123:role/x"));
    assert!(copy
        .sql()
        .contains("FORMAT AS JSON 's3://bucket/log_json_path.json'"));
    assert!(copy.sql().contains("TIMEFORMAT AS 'epochmillisecs'"));
    assert!(copy.sql().contains("BLANKSASNULL"));
    assert!(copy.sql().contains("EMPTYASNULL"));
    assert!(!copy.sql().contains("REGION"));
    assert_fully_rendered(copy);
}

#[test]
fn test_staging_songs_copy_embeds_configuration() {
    let catalog = catalog();
    let copy = &catalog.staging_load_statements()[1];

    assert_eq!(copy.table(), "staging_songs");
    assert!(copy.sql().contains("FROM 's3://bucket/songs'"));
    assert!(copy.sql().contains("IAM_ROLE 'arn:aws:iam::123:role/x'"));
    assert!(copy.sql().contains("FORMAT AS JSON 'auto'"));
    assert_fully_rendered(copy);
}

#[test]
fn test_region_added_to_copies_when_configured() {
    let config = Config::from_yaml(&config_yaml("  REGION: us-west-2\n")).unwrap();
    let catalog = QueryCatalog::new(&config).unwrap();

    for copy in catalog.staging_load_statements() {
        assert!(copy.sql().contains("REGION 'us-west-2'"), "{}", copy.sql());
        assert_fully_rendered(copy);
    }
}

#[test]
fn test_every_statement_fully_rendered() {
    let catalog = catalog();
    for phase in [
        Phase::Drop,
        Phase::Create,
        Phase::Staging,
        Phase::Final,
        Phase::Report,
    ] {
        for statement in catalog.statements(phase) {
            assert_fully_rendered(statement);
        }
    }
}

#[test]
fn test_create_order_staging_then_dimensions_then_fact() {
    let catalog = catalog();
    assert_eq!(
        tables(catalog.create_statements()),
        vec![
            "staging_events",
            "staging_songs",
            "users",
            "songs",
            "artists",
            "time",
            "songplays"
        ]
    );
}

#[test]
fn test_drop_order_is_reverse_of_create_order() {
    let catalog = catalog();
    let mut expected = tables(catalog.create_statements());
    expected.reverse();

    assert_eq!(tables(catalog.drop_statements()), expected);
    assert_eq!(catalog.drop_statements()[0].table(), "songplays");
}

#[test]
fn test_drop_statements_are_idempotent() {
    let catalog = catalog();
    for drop in catalog.drop_statements() {
        assert_eq!(drop.kind(), StatementKind::Drop);
        assert!(drop.sql().starts_with("DROP TABLE IF EXISTS "));
    }
    assert!(catalog
        .drop_statements()
        .iter()
        .any(|s| s.sql() == "DROP TABLE IF EXISTS \"time\""));
}

#[test]
fn test_create_constraints_by_table_kind() {
    let catalog = catalog();
    for create in catalog.create_statements() {
        let sql = create.sql();
        match create.table() {
            "staging_events" | "staging_songs" => {
                assert!(!sql.contains("PRIMARY KEY"));
                assert!(!sql.contains("REFERENCES"));
            }
            "songplays" => {
                assert!(sql.contains("IDENTITY(0, 1)"));
                for dim in ["\"time\"", "users", "songs", "artists"] {
                    assert!(sql.contains(&format!("REFERENCES {dim}")), "{sql}");
                }
            }
            _ => {
                assert!(sql.contains("PRIMARY KEY"));
                assert!(!sql.contains("REFERENCES"));
            }
        }
    }
}

#[test]
fn test_final_inserts_fill_dimensions_before_fact() {
    let catalog = catalog();
    assert_eq!(
        tables(catalog.final_insert_statements()),
        vec!["users", "songs", "artists", "time", "songplays"]
    );
    assert!(catalog
        .final_insert_statements()
        .iter()
        .all(|s| s.kind() == StatementKind::Insert));
}

#[test]
fn test_dimension_inserts_deduplicate() {
    let catalog = catalog();
    for insert in catalog.final_insert_statements() {
        match insert.table() {
            "songplays" => continue,
            // one row per user, from the most recent event
            "users" => assert!(
                insert
                    .sql()
                    .contains("ROW_NUMBER() OVER (PARTITION BY user_id ORDER BY ts DESC)"),
                "{}",
                insert.sql()
            ),
            _ => assert!(insert.sql().contains("SELECT DISTINCT"), "{}", insert.sql()),
        }
        assert!(insert.sql().contains("NOT IN"), "{}", insert.sql());
    }
}

#[test]
fn test_fact_insert_filters_next_song() {
    let catalog = catalog();
    let fact = catalog.final_insert_statements().last().unwrap();
    assert!(fact.sql().contains("WHERE e.page = 'NextSong'"));
    assert!(fact.sql().contains("e.artist = s.artist_name"));
    assert!(fact.sql().contains("e.song = s.title"));
}

#[test]
fn test_report_statements_return_rows() {
    let catalog = catalog();
    assert_eq!(catalog.report_statements().len(), 7);
    assert!(catalog
        .report_statements()
        .iter()
        .all(|s| s.kind().returns_rows()));
    assert!(!catalog
        .create_statements()
        .iter()
        .any(|s| s.kind().returns_rows()));
}

#[test]
fn test_statements_by_phase() {
    let catalog = catalog();
    assert_eq!(
        catalog.statements(Phase::Staging),
        catalog.staging_load_statements()
    );
    assert_eq!(
        catalog.statements(Phase::Final),
        catalog.final_insert_statements()
    );
    assert_eq!(catalog.statements(Phase::Drop).len(), 7);
}

const CREATE_A: Template = Template {
    name: "a.sql",
    source: "CREATE TABLE a (id INT)",
};
const CREATE_B: Template = Template {
    name: "b.sql",
    source: "CREATE TABLE b (id INT)",
};

#[test]
fn test_reference_cycle_rejected() {
    let tables = [
        TableDef {
            name: "a",
            kind: TableKind::Dimension,
            references: &["b"],
            create: CREATE_A,
            load: None,
        },
        TableDef {
            name: "b",
            kind: TableKind::Dimension,
            references: &["a"],
            create: CREATE_B,
            load: None,
        },
    ];

    let err = QueryCatalog::build(&tables, TemplateParams::new()).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Graph(dwh_core::CoreError::CircularDependency { .. })
    ));
}

#[test]
fn test_undefined_parameter_rejected_at_construction() {
    let tables = [TableDef {
        name: "a",
        kind: TableKind::Staging,
        references: &[],
        create: CREATE_A,
        load: Some(Template {
            name: "copy_a.sql",
            source: "COPY a FROM '{{ missing_uri }}'",
        }),
    }];

    let err = QueryCatalog::build(&tables, TemplateParams::new()).unwrap_err();
    match err {
        CatalogError::Render { table, .. } => assert_eq!(table, "a"),
        other => panic!("unexpected error: {other}"),
    }
}
