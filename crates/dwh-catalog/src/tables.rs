//! Table definitions for the song-play star schema
//!
//! Declaration order matters only as a tie-breaker: the catalog derives
//! create and drop order from the `references` edges, falling back to the
//! order below for tables that do not depend on each other.

/// Role a table plays in the warehouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Raw landing table filled by COPY
    Staging,
    /// Descriptive attributes referenced by the fact table
    Dimension,
    /// One row per song play
    Fact,
}

/// A named SQL template embedded in the binary
#[derive(Debug, Clone, Copy)]
pub struct Template {
    /// Template name, also the file name under `sql/`
    pub name: &'static str,
    /// Template source
    pub source: &'static str,
}

macro_rules! sql_template {
    ($file:literal) => {
        Template {
            name: $file,
            source: include_str!(concat!("../sql/", $file)),
        }
    };
}

/// Static definition of one warehouse table
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    /// Table name
    pub name: &'static str,
    /// Role of the table
    pub kind: TableKind,
    /// Tables this one holds foreign keys into
    pub references: &'static [&'static str],
    /// `CREATE TABLE` template
    pub create: Template,
    /// COPY template for staging tables, `INSERT ... SELECT` otherwise
    pub load: Option<Template>,
}

/// Every table of the star schema, in declaration order
pub const STAR_SCHEMA: &[TableDef] = &[
    TableDef {
        name: "staging_events",
        kind: TableKind::Staging,
        references: &[],
        create: sql_template!("create_staging_events.sql"),
        load: Some(sql_template!("copy_staging_events.sql")),
    },
    TableDef {
        name: "staging_songs",
        kind: TableKind::Staging,
        references: &[],
        create: sql_template!("create_staging_songs.sql"),
        load: Some(sql_template!("copy_staging_songs.sql")),
    },
    TableDef {
        name: "users",
        kind: TableKind::Dimension,
        references: &[],
        create: sql_template!("create_users.sql"),
        load: Some(sql_template!("insert_users.sql")),
    },
    TableDef {
        name: "songs",
        kind: TableKind::Dimension,
        references: &[],
        create: sql_template!("create_songs.sql"),
        load: Some(sql_template!("insert_songs.sql")),
    },
    TableDef {
        name: "artists",
        kind: TableKind::Dimension,
        references: &[],
        create: sql_template!("create_artists.sql"),
        load: Some(sql_template!("insert_artists.sql")),
    },
    TableDef {
        name: "time",
        kind: TableKind::Dimension,
        references: &[],
        create: sql_template!("create_time.sql"),
        load: Some(sql_template!("insert_time.sql")),
    },
    TableDef {
        name: "songplays",
        kind: TableKind::Fact,
        references: &["time", "users", "songs", "artists"],
        create: sql_template!("create_songplays.sql"),
        load: Some(sql_template!("insert_songplays.sql")),
    },
];

/// Look up a table definition by name
pub fn find_table<'a>(tables: &'a [TableDef], name: &str) -> Option<&'a TableDef> {
    tables.iter().find(|t| t.name == name)
}
