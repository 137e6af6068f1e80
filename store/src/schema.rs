//! SQL for the reference schema, its seed data and the practice log.
//!
//! # Table structure
//!
//! - `departments`, `employees`, `orders` — read-only reference data that
//!   practice queries run against, seeded once.
//! - `practice_log` — one row per saved practice attempt.
//!
//! Every statement is safe to re-run: tables and indexes use
//! `IF NOT EXISTS`, and missing log columns are added with
//! `ALTER TABLE ... ADD COLUMN` rather than by recreating the table.

/// Name of the practice log table.
pub(crate) const LOG_TABLE: &str = "practice_log";

/// Columns the practice log must have besides `id`, with their SQL types.
///
/// `created_at` carries no default here: SQLite refuses non-constant
/// defaults on `ADD COLUMN`, so inserts always set it explicitly.
pub(crate) const LOG_COLUMN_TYPES: [(&str, &str); 7] = [
    ("topic", "TEXT"),
    ("question_title", "TEXT"),
    ("query_text", "TEXT"),
    ("user_note", "TEXT"),
    ("rows_returned", "INTEGER"),
    ("exec_time_ms", "INTEGER"),
    ("created_at", "TEXT"),
];

/// Row counts produced by [`SEED_SQL`].
pub const SEED_DEPARTMENTS: usize = 5;
pub const SEED_EMPLOYEES: usize = 12;
pub const SEED_ORDERS: usize = 15;

/// Creates the reference tables and the practice log.
pub(crate) const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS departments (
    id INTEGER PRIMARY KEY,
    dept_name TEXT NOT NULL,
    location TEXT
);

CREATE TABLE IF NOT EXISTS employees (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    dept_id INTEGER,
    salary REAL,
    hire_date TEXT,
    email TEXT,
    FOREIGN KEY (dept_id) REFERENCES departments(id)
);

CREATE TABLE IF NOT EXISTS orders (
    order_id INTEGER PRIMARY KEY,
    customer_name TEXT NOT NULL,
    order_date TEXT,
    amount REAL,
    employee_id INTEGER,
    status TEXT,
    FOREIGN KEY (employee_id) REFERENCES employees(id)
);

CREATE TABLE IF NOT EXISTS practice_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    topic TEXT,
    question_title TEXT,
    query_text TEXT,
    user_note TEXT,
    rows_returned INTEGER,
    exec_time_ms INTEGER,
    created_at TEXT DEFAULT (datetime('now'))
);
"#;

/// Indexes that depend on log columns, applied after the column check.
pub(crate) const INDEX_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_practice_log_question ON practice_log(topic, question_title);
"#;

/// Reference data, inserted only while `departments` is empty.
pub(crate) const SEED_SQL: &str = r#"
INSERT INTO departments (id, dept_name, location) VALUES
    (1, 'Engineering', 'New York'),
    (2, 'Sales', 'Chicago'),
    (3, 'Marketing', 'San Francisco'),
    (4, 'Finance', 'Boston'),
    (5, 'Human Resources', 'Austin');

INSERT INTO employees (id, name, dept_id, salary, hire_date, email) VALUES
    (1, 'Alice Johnson', 1, 95000, '2019-03-15', 'alice.johnson@example.com'),
    (2, 'Bob Smith', 2, 62000, '2020-07-01', 'bob.smith@example.com'),
    (3, 'Carol White', 1, 105000, '2018-11-20', 'carol.white@example.com'),
    (4, 'David Brown', 3, 58000, '2021-02-10', 'david.brown@example.com'),
    (5, 'Eva Green', 4, 72000, '2022-05-23', 'eva.green@example.com'),
    (6, 'Frank Miller', 2, 67000, '2022-09-12', 'frank.miller@example.com'),
    (7, 'Grace Lee', 1, 88000, '2023-01-09', 'grace.lee@example.com'),
    (8, 'Henry Wilson', 5, 54000, '2020-04-18', 'henry.wilson@example.com'),
    (9, 'Irene Davis', 3, 61000, '2021-08-30', 'irene.davis@example.com'),
    (10, 'Jack Taylor', 4, 79000, '2017-06-05', 'jack.taylor@example.com'),
    (11, 'Karen Thomas', 2, 70500, '2023-03-27', 'karen.thomas@example.com'),
    (12, 'Liam Moore', NULL, 48000, '2024-01-15', NULL);

INSERT INTO orders (order_id, customer_name, order_date, amount, employee_id, status) VALUES
    (1001, 'Acme Corp', '2023-01-12', 2500.00, 2, 'completed'),
    (1002, 'Globex', '2023-02-03', 1200.50, 6, 'completed'),
    (1003, 'Initech', '2023-02-17', 830.00, 2, 'cancelled'),
    (1004, 'Umbrella', '2023-03-08', 4300.75, 11, 'shipped'),
    (1005, 'Acme Corp', '2023-04-21', 150.00, 6, 'completed'),
    (1006, 'Stark Industries', '2023-05-30', 9800.00, 11, 'completed'),
    (1007, 'Wayne Enterprises', '2023-06-14', 3200.00, 2, 'shipped'),
    (1008, 'Globex', '2023-07-02', 640.25, NULL, 'pending'),
    (1009, 'Initech', '2023-08-19', 1875.00, 6, 'completed'),
    (1010, 'Hooli', '2023-09-05', 5400.00, 11, 'pending'),
    (1011, 'Umbrella', '2023-10-11', 720.00, 2, 'cancelled'),
    (1012, 'Acme Corp', '2023-11-23', 2999.99, 6, 'shipped'),
    (1013, 'Stark Industries', '2024-01-08', 12500.00, 11, 'pending'),
    (1014, 'Hooli', '2024-02-14', 430.00, 2, 'completed'),
    (1015, 'Wayne Enterprises', '2024-03-01', 2100.00, NULL, 'pending');
"#;
