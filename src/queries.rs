//! Catalog queries shared by the engine's introspection helpers and the
//! built-in meta-commands.

/// Ordinary tables visible in the current search path, excluding system
/// and catalog schemas, ordered by name.
pub(crate) const TABLES: &str = "\
SELECT c.relname AS \"Name\" \
FROM pg_catalog.pg_class c \
LEFT JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
WHERE c.relkind IN ('r', '') \
  AND n.nspname <> 'pg_catalog' \
  AND n.nspname <> 'information_schema' \
  AND n.nspname !~ '^pg_toast' \
  AND pg_catalog.pg_table_is_visible(c.oid) \
ORDER BY 1";

/// Column names of one table; takes the table name as `$1`.
pub(crate) const COLUMNS: &str =
    "SELECT column_name FROM information_schema.columns WHERE table_name = $1::text";

/// Databases on the server with owner, encoding, and collation metadata,
/// ordered by name.
pub(crate) const DATABASES: &str = "\
SELECT d.datname AS \"Name\", \
       pg_catalog.pg_get_userbyid(d.datdba) AS \"Owner\", \
       pg_catalog.pg_encoding_to_char(d.encoding) AS \"Encoding\", \
       d.datcollate AS \"Collate\", \
       d.datctype AS \"Ctype\" \
FROM pg_catalog.pg_database d \
ORDER BY 1";
