use serde::{Deserialize, Serialize};

/// Employee record as listed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub department: String,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// The slice of an employee the assistant needs for prompt context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectoryEntry {
    pub name: String,
    pub department: String,
}

impl From<Employee> for DirectoryEntry {
    fn from(e: Employee) -> Self {
        Self {
            name: e.name,
            department: e.department,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Department {
    pub name: String,
    pub employees: Vec<String>,
}

/// Groups entries by department, keeping the order in which departments first appear.
pub fn group_by_department(entries: &[DirectoryEntry]) -> Vec<Department> {
    let mut departments: Vec<Department> = Vec::new();
    for entry in entries {
        match departments.iter_mut().find(|d| d.name == entry.department) {
            Some(dept) => dept.employees.push(entry.name.clone()),
            None => departments.push(Department {
                name: entry.department.clone(),
                employees: vec![entry.name.clone()],
            }),
        }
    }
    departments
}

pub fn directory_to_prompt(entries: &[DirectoryEntry]) -> String {
    if entries.is_empty() {
        return "No employees available".to_string();
    }
    entries
        .iter()
        .map(|e| format!("{} ({})", e.name, e.department))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, dept: &str) -> DirectoryEntry {
        DirectoryEntry {
            name: name.to_string(),
            department: dept.to_string(),
        }
    }

    #[test]
    fn test_group_by_department_first_seen_order() {
        let entries = vec![
            entry("Arjun Mehta", "Developers"),
            entry("Priya Shah", "HR"),
            entry("Ravi Kumar", "Developers"),
        ];
        let grouped = group_by_department(&entries);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].name, "Developers");
        assert_eq!(grouped[0].employees, vec!["Arjun Mehta", "Ravi Kumar"]);
        assert_eq!(grouped[1].name, "HR");
    }

    #[test]
    fn test_directory_to_prompt() {
        let entries = vec![entry("Arjun Mehta", "Developers"), entry("Priya Shah", "HR")];
        assert_eq!(
            directory_to_prompt(&entries),
            "Arjun Mehta (Developers), Priya Shah (HR)"
        );
        assert_eq!(directory_to_prompt(&[]), "No employees available");
    }

    #[test]
    fn test_employee_from_backend_json() {
        let json = r#"{"id":3,"name":"Arjun Mehta","email":"arjun@k.com","department":"Developers","designation":null,"phone":null,"is_active":true,"created_at":"2025-01-01T00:00:00"}"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        let entry: DirectoryEntry = employee.into();
        assert_eq!(entry.name, "Arjun Mehta");
        assert_eq!(entry.department, "Developers");
    }
}
