//! Entry points driven end to end without a warehouse

use clap::Parser;
use dwh_cli::cli::{CreateTablesCli, EtlCli};
use dwh_cli::commands::{create_tables, etl};
use dwh_cli::context::RuntimeContext;
use dwh_db::Database;
use dwh_etl::{LoadSummary, StdoutSink};
use std::io::Write;
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
CLUSTER:
  HOST: example.abc123.us-west-2.redshift.amazonaws.com
  DB_NAME: dev
  DB_USER: awsuser
  DB_PASSWORD: from-file
  DB_PORT: 5439
IAM_ROLE:
  ARN: arn:aws:iam::123:role/x
S3:
  LOG_DATA: s3://bucket/logs
  LOG_JSONPATH: s3://bucket/log_json_path.json
  SONG_DATA: s3://bucket/songs
"#;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn path_of(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

fn captured(sink: StdoutSink<Vec<u8>>) -> String {
    String::from_utf8(sink.into_inner()).unwrap()
}

#[tokio::test]
async fn test_create_tables_dry_run() {
    let file = config_file(CONFIG);
    let cli =
        CreateTablesCli::try_parse_from(["create-tables", "--dry-run", "--config", path_of(&file)])
            .unwrap();
    let ctx = RuntimeContext::new(&cli.common).unwrap();
    let mut sink = StdoutSink::new(Vec::new());

    let summary = create_tables::run(&ctx, &mut sink).await.unwrap();
    assert_eq!(summary.drop.statements(), summary.create.statements());

    let out = captured(sink);
    assert!(out.contains("Running query [drop 1/"));
    assert!(out.contains("DROP TABLE IF EXISTS"));
    assert!(out.contains("CREATE TABLE"));
}

#[tokio::test]
async fn test_etl_dry_run_with_skips() {
    let file = config_file(CONFIG);
    let cli = EtlCli::try_parse_from([
        "etl",
        "--dry-run",
        "-s",
        "--report-counts",
        "--config",
        path_of(&file),
    ])
    .unwrap();
    let ctx = RuntimeContext::new(&cli.common).unwrap();
    let mut sink = StdoutSink::new(Vec::new());

    let summary = etl::run(&ctx, cli.load_options(), &mut sink).await.unwrap();
    assert!(summary.staging.is_none());
    assert!(etl::summary_line(&summary).starts_with("Completed "));

    let out = captured(sink);
    assert!(out.contains("Not loading s3 bucket data into staging tables."));
    assert!(out.contains("INSERT INTO songplays"));
    assert!(!out.contains("COPY "));
}

#[tokio::test]
async fn test_quiet_dry_run_keeps_stdout_clean() {
    let file = config_file(CONFIG);
    let cli =
        EtlCli::try_parse_from(["etl", "--dry-run", "--quiet", "-f", "--config", path_of(&file)])
            .unwrap();

    // progress goes through LogSink, with no logger installed
    etl::execute(&cli).await.unwrap();
}

#[test]
fn test_summary_line_when_every_phase_skipped() {
    assert_eq!(etl::summary_line(&LoadSummary::default()), "Nothing to load");
}

#[tokio::test]
async fn test_dry_run_session_is_not_remote() {
    let file = config_file(CONFIG);
    let cli = EtlCli::try_parse_from(["etl", "--dry-run", "--config", path_of(&file)]).unwrap();

    let ctx = RuntimeContext::new(&cli.common).unwrap();
    let db = ctx.connect().await.unwrap();
    assert_eq!(db.db_type(), "dry-run");
}

#[test]
fn test_password_override() {
    let file = config_file(CONFIG);
    let cli = EtlCli::try_parse_from([
        "etl",
        "--db-password",
        "from-env",
        "--config",
        path_of(&file),
    ])
    .unwrap();

    let ctx = RuntimeContext::new(&cli.common).unwrap();
    assert_eq!(ctx.config.cluster.db_password, "from-env");
}

#[test]
fn test_missing_config_names_path() {
    let cli = EtlCli::try_parse_from(["etl", "--config", "/nonexistent/dwh.yml"]).unwrap();

    let err = RuntimeContext::new(&cli.common).err().unwrap();
    let chain = format!("{:#}", err);
    assert!(chain.contains("/nonexistent/dwh.yml"));
    assert!(chain.contains("[E001]"));
}

#[test]
fn test_invalid_config_fails_before_connecting() {
    let file = config_file(&CONFIG.replace("s3://bucket/logs", ""));
    let cli = EtlCli::try_parse_from(["etl", "--config", path_of(&file)]).unwrap();

    assert!(RuntimeContext::new(&cli.common).is_err());
}
