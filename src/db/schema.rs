pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    registered TIMESTAMP,
    fb_id VARCHAR NOT NULL,
    name VARCHAR
);

CREATE UNIQUE INDEX IF NOT EXISTS users_fb_id_uindex ON users (fb_id);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    user_id INTEGER,
    FOREIGN KEY (user_id) REFERENCES users (id)
);

CREATE TABLE IF NOT EXISTS activities (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    npom INT DEFAULT 0,
    createtime TIMESTAMP NOT NULL,
    category_id INTEGER,
    vorder INT DEFAULT 0 NOT NULL,
    FOREIGN KEY (category_id) REFERENCES categories (id)
);

CREATE TABLE IF NOT EXISTS history (
    id INTEGER PRIMARY KEY,
    tstamp TIMESTAMP NOT NULL,
    done INT DEFAULT 0,
    activity_id INTEGER
        CONSTRAINT history_activities_id_fk
            REFERENCES activities (id)
                ON DELETE CASCADE,
    user_id INTEGER,
    FOREIGN KEY (user_id) REFERENCES users (id)
);

CREATE INDEX IF NOT EXISTS idx_categories_user ON categories(user_id);
CREATE INDEX IF NOT EXISTS idx_activities_category ON activities(category_id);
CREATE INDEX IF NOT EXISTS idx_history_activity_tstamp ON history(activity_id, tstamp);
"#;

/// Tables the server expects after bootstrap.
pub const TABLES: &[&str] = &["users", "categories", "activities", "history"];
