//! Ten-person sample table.

use tabula_model::{CellValue, ColumnError, ColumnName, Row};

use crate::config::DEFAULT_COLUMNS;

const PEOPLE: [(&str, &str, i64, &str); 10] = [
    ("Sandeep", "sandeep@example.com", 25, "Developer"),
    ("Ravi", "ravi@example.com", 30, "Manager"),
    ("Priya", "priya@example.com", 28, "Designer"),
    ("Anjali", "anjali@example.com", 26, "Tester"),
    ("Amit", "amit@example.com", 35, "Team Lead"),
    ("Karan", "karan@example.com", 29, "Engineer"),
    ("Neha", "neha@example.com", 31, "QA Engineer"),
    ("Arjun", "arjun@example.com", 27, "Frontend Dev"),
    ("Meera", "meera@example.com", 24, "Intern"),
    ("Vivek", "vivek@example.com", 33, "Backend Dev"),
];

/// Demo rows over [`DEFAULT_COLUMNS`], with ids `1..=10` and numeric ages.
pub fn demo_rows() -> Result<Vec<Row>, ColumnError> {
    let [name, email, age, role] = [
        ColumnName::new(DEFAULT_COLUMNS[0])?,
        ColumnName::new(DEFAULT_COLUMNS[1])?,
        ColumnName::new(DEFAULT_COLUMNS[2])?,
        ColumnName::new(DEFAULT_COLUMNS[3])?,
    ];
    Ok(PEOPLE
        .iter()
        .enumerate()
        .map(|(index, (person, mail, years, job))| {
            Row::new((index + 1).to_string())
                .with(name.clone(), *person)
                .with(email.clone(), *mail)
                .with(age.clone(), CellValue::from(*years))
                .with(role.clone(), *job)
        })
        .collect())
}
