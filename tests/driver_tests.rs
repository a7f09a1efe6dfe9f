//! End-to-end tests of the CRUD driver against SQLite.

#[cfg(test)]
mod driver_tests {
    use rusqlite::Connection;
    use serde::Deserialize;
    use simple_crud::{CrudError, Driver, QueryHook};

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Language {
        id: i64,
        name: String,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Article {
        id: i64,
        title: String,
        published: bool,
        rating: Option<f64>,
    }

    const LANGUAGES: &str = "id INTEGER PRIMARY KEY,\nname TEXT UNIQUE";
    const ARTICLES: &str = "id INTEGER PRIMARY KEY, title TEXT NOT NULL, published BOOLEAN DEFAULT 0, rating REAL";

    /// The `languages` scenario: one seeded row, `(1, 'indonesian')`.
    fn languages() -> Driver<Language> {
        let driver = Driver::new(Connection::open_in_memory().unwrap());
        driver.init_db("languages", LANGUAGES).unwrap();
        driver.create_row("languages", "id, name", "1, 'indonesian'").unwrap();
        driver
    }

    fn articles() -> Driver<Article> {
        let driver = Driver::new(Connection::open_in_memory().unwrap());
        driver.init_db("articles", ARTICLES).unwrap();
        for (id, title, published, rating) in [
            (1, "Article 1", 1, "4.5"),
            (2, "Article 2", 0, "NULL"),
            (3, "Article 3", 1, "3"),
        ] {
            driver
                .create_row(
                    "articles",
                    "id, title, published, rating",
                    &format!("{}, '{}', {}, {}", id, title, published, rating),
                )
                .unwrap();
        }
        driver
    }

    #[test]
    fn test_duplicate_insert_is_reported() {
        let driver = languages();
        match driver.create_row("languages", "name", "'indonesian'") {
            Err(CrudError::DuplicateRow) => {}
            other => panic!("Expected DuplicateRow, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_primary_key_is_reported() {
        let driver = languages();
        assert!(matches!(
            driver.create_row("languages", "id, name", "1, 'french'"),
            Err(CrudError::DuplicateRow)
        ));
    }

    #[test]
    fn test_other_constraint_errors_pass_through() {
        let driver = articles();
        match driver.create_row("articles", "id", "10") {
            Err(CrudError::Database(e)) => assert!(e.to_string().contains("NOT NULL")),
            other => panic!("Expected Database error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_row_by_name() {
        let driver = languages();
        let lang = driver
            .read_row("languages", &QueryHook::new("name", "indonesian"))
            .unwrap();
        assert_eq!(lang, Language { id: 1, name: "indonesian".to_string() });
    }

    #[test]
    fn test_read_row_by_integer_column() {
        let driver = languages();
        let lang = driver.read_row("languages", &QueryHook::new("id", "1")).unwrap();
        assert_eq!(lang.name, "indonesian");
    }

    #[test]
    fn test_read_row_without_match() {
        let driver = languages();
        match driver.read_row("languages", &QueryHook::new("name", "french")) {
            Err(CrudError::RowNotExist) => {}
            other => panic!("Expected RowNotExist, got {:?}", other),
        }
    }

    #[test]
    fn test_read_row_quotes_values() {
        let driver = languages();
        driver.create_row("languages", "name", "'o''odham'").unwrap();
        let lang = driver
            .read_row("languages", &QueryHook::new("name", "o'odham"))
            .unwrap();
        assert_eq!(lang.id, 2);
    }

    #[test]
    fn test_inserted_row_is_visible() {
        let driver = languages();
        driver.create_row("languages", "name", "'french'").unwrap();

        let french = driver
            .read_row("languages", &QueryHook::new("name", "french"))
            .unwrap();
        assert_eq!(french, Language { id: 2, name: "french".to_string() });

        let all = driver.read_all_rows("languages").unwrap();
        assert_eq!(
            all,
            vec![
                Language { id: 1, name: "indonesian".to_string() },
                Language { id: 2, name: "french".to_string() },
            ]
        );
    }

    #[test]
    fn test_read_all_rows_on_empty_table() {
        let driver: Driver<Language> = Driver::new(Connection::open_in_memory().unwrap());
        driver.init_db("languages", LANGUAGES).unwrap();
        let all = driver.read_all_rows("languages").unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn test_read_all_rows_decodes_mixed_types() {
        let driver = articles();
        let all = driver.read_all_rows("articles").unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(
            all[0],
            Article { id: 1, title: "Article 1".to_string(), published: true, rating: Some(4.5) }
        );
        assert!(!all[1].published);
        assert_eq!(all[1].rating, None);
        assert_eq!(all[2].rating, Some(3.0));
    }

    #[test]
    fn test_decode_failure_is_surfaced() {
        #[derive(Debug, Deserialize)]
        struct Strict {
            #[allow(dead_code)]
            rating: f64,
        }

        let driver: Driver<Strict> = Driver::new(Connection::open_in_memory().unwrap());
        driver.init_db("articles", ARTICLES).unwrap();
        driver.create_row("articles", "id, title", "1, 'untitled'").unwrap();

        match driver.read_all_rows("articles") {
            Err(CrudError::Decode { message, row }) => {
                assert!(message.contains("column `rating`"), "{}", message);
                assert!(row.contains("\"title\":\"untitled\""), "{}", row);
            }
            other => panic!("Expected Decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_text_is_not_replaced() {
        #[derive(Debug, Deserialize)]
        struct Named {
            #[allow(dead_code)]
            name: String,
        }

        #[derive(Debug, Deserialize)]
        struct RawNamed {
            id: i64,
            name: Vec<u8>,
        }

        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER, name TEXT);
             INSERT INTO t VALUES (1, CAST(x'66ff6f' AS TEXT));",
        )
        .unwrap();

        let named: Driver<Named, _> = Driver::new(&conn);
        match named.read_all_rows("t") {
            Err(CrudError::Decode { message, .. }) => {
                assert!(message.contains("column `name`"), "{}", message);
                assert!(message.contains("UTF-8"), "{}", message);
            }
            other => panic!("Expected Decode error, got {:?}", other),
        }

        let raw: Driver<RawNamed, _> = Driver::new(&conn);
        let rows = raw.read_all_rows("t").unwrap();
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].name, vec![0x66, 0xff, 0x6f]);
    }

    #[test]
    fn test_update_row() {
        let driver = languages();
        driver
            .update_row("languages", "name = 'bahasa'", &QueryHook::new("id", "1"))
            .unwrap();
        let lang = driver.read_row("languages", &QueryHook::new("id", "1")).unwrap();
        assert_eq!(lang.name, "bahasa");

        match driver.update_row("languages", "name = 'x'", &QueryHook::new("name", "french")) {
            Err(CrudError::RowUpdateFailed) => {}
            other => panic!("Expected RowUpdateFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_update_many_rows_succeeds() {
        let driver = articles();
        driver
            .update_row("articles", "rating = 5", &QueryHook::new("published", "1"))
            .unwrap();
        let all = driver.read_all_rows("articles").unwrap();
        assert_eq!(all[0].rating, Some(5.0));
        assert_eq!(all[2].rating, Some(5.0));
        assert_eq!(all[1].rating, None);
    }

    #[test]
    fn test_delete_row() {
        let driver = languages();
        match driver.delete_row("languages", &QueryHook::new("name", "french")) {
            Err(CrudError::RowDeleteFailed) => {}
            other => panic!("Expected RowDeleteFailed, got {:?}", other),
        }

        driver
            .delete_row("languages", &QueryHook::new("name", "indonesian"))
            .unwrap();
        assert!(driver.read_all_rows("languages").unwrap().is_empty());
    }

    #[test]
    fn test_delete_rows_by_list() {
        let driver = articles();
        driver
            .delete_rows("articles", &QueryHook::new("title", "'Article 1', 'Article 3'"))
            .unwrap();
        let remaining = driver.read_all_rows("articles").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 2);

        match driver.delete_rows("articles", &QueryHook::new("id", "7, 8, 9")) {
            Err(CrudError::RowDeleteFailed) => {}
            other => panic!("Expected RowDeleteFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_init_db_is_idempotent_and_drop_table() {
        let driver = languages();
        driver.init_db("languages", LANGUAGES).unwrap();
        assert_eq!(driver.read_all_rows("languages").unwrap().len(), 1);

        driver.drop_table("languages").unwrap();
        match driver.drop_table("languages") {
            Err(CrudError::Database(e)) => assert!(e.to_string().contains("no such table")),
            other => panic!("Expected Database error, got {:?}", other),
        }
        assert!(matches!(
            driver.read_all_rows("languages"),
            Err(CrudError::Database(_))
        ));
    }

    #[test]
    fn test_domain_errors_are_distinguishable() {
        let driver = languages();
        let domain = driver
            .read_row("languages", &QueryHook::new("name", "french"))
            .unwrap_err();
        let infra = driver
            .read_row("nonexistent_table", &QueryHook::new("name", "french"))
            .unwrap_err();
        assert!(domain.is_domain());
        assert!(!infra.is_domain());
    }

    #[test]
    fn test_file_database_persists_between_drivers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("languages.db");

        {
            let driver: Driver<Language> = Driver::new(Connection::open(&path).unwrap());
            driver.init_db("languages", LANGUAGES).unwrap();
            driver.create_row("languages", "name", "'indonesian'").unwrap();
        }

        let driver: Driver<Language> = Driver::new(Connection::open(&path).unwrap());
        let all = driver.read_all_rows("languages").unwrap();
        assert_eq!(all, vec![Language { id: 1, name: "indonesian".to_string() }]);
    }
}
