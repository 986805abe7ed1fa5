//! Predefined skill suggestions, grouped by category.

use serde::Serialize;

pub const CATALOG: &[(&str, &[&str])] = &[
    (
        "Programming Languages",
        &[
            "C", "C++", "C#", "Dart", "Elixir", "Go", "Haskell", "Java", "JavaScript", "Kotlin",
            "Lua", "MATLAB", "Objective-C", "PHP", "Python", "R", "Ruby", "Rust", "Scala",
            "Shell", "SQL", "Swift", "TypeScript", "Zig",
        ],
    ),
    (
        "Frameworks & Libraries",
        &[
            "Angular", "ASP.NET", "Axum", "Django", "Express", "FastAPI", "Flask", "Flutter",
            "Gin", "jQuery", "Laravel", "NestJS", "Next.js", "Node.js", "NumPy", "Pandas",
            "PyTorch", "Rails", "React", "React Native", "Spring Boot", "Svelte", "TensorFlow",
            "Tokio", "Vue.js",
        ],
    ),
    (
        "Databases",
        &[
            "Cassandra", "DynamoDB", "Elasticsearch", "Firebase", "MariaDB", "MongoDB",
            "MySQL", "Neo4j", "Oracle", "PostgreSQL", "Redis", "SQLite", "SQL Server",
        ],
    ),
    (
        "Cloud & DevOps",
        &[
            "Ansible", "AWS", "Azure", "CI/CD", "Docker", "GitHub Actions", "Google Cloud",
            "Helm", "Jenkins", "Kubernetes", "Linux", "Nginx", "Prometheus", "Terraform",
        ],
    ),
    (
        "Tools",
        &[
            "Figma", "Git", "GraphQL", "Jira", "Kafka", "Postman", "RabbitMQ", "REST APIs",
            "VS Code", "Webpack",
        ],
    ),
    (
        "Soft Skills",
        &[
            "Communication", "Leadership", "Mentoring", "Problem Solving", "Project Management",
            "Public Speaking", "Teamwork", "Time Management",
        ],
    ),
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkillMatch {
    pub skill: &'static str,
    pub category: &'static str,
}

pub fn categories() -> Vec<&'static str> {
    CATALOG.iter().map(|(category, _)| *category).collect()
}

/// Skills of one category, matched case-insensitively.
pub fn skills_in(category: &str) -> Option<&'static [&'static str]> {
    CATALOG
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(category.trim()))
        .map(|(_, skills)| *skills)
}

pub fn category_of(skill: &str) -> Option<&'static str> {
    let skill = skill.trim();
    CATALOG
        .iter()
        .find(|(_, skills)| skills.iter().any(|s| s.eq_ignore_ascii_case(skill)))
        .map(|(category, _)| *category)
}

/// Case-insensitive substring search. Prefix matches come first, then
/// catalog order; duplicates across categories are kept once.
pub fn search(query: &str, limit: usize) -> Vec<SkillMatch> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut prefix = Vec::new();
    let mut contains = Vec::new();
    for (category, skills) in CATALOG {
        for skill in *skills {
            let hay = skill.to_lowercase();
            let found = SkillMatch {
                skill: *skill,
                category: *category,
            };
            if hay.starts_with(&needle) {
                prefix.push(found);
            } else if hay.contains(&needle) {
                contains.push(found);
            }
        }
    }

    let mut seen = std::collections::HashSet::new();
    prefix
        .into_iter()
        .chain(contains)
        .filter(|m| seen.insert(m.skill))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_listed_in_order() {
        let cats = categories();
        assert_eq!(cats.first(), Some(&"Programming Languages"));
        assert_eq!(cats.len(), CATALOG.len());
    }

    #[test]
    fn test_skills_in_case_insensitive() {
        let dbs = skills_in("databases").unwrap();
        assert!(dbs.contains(&"PostgreSQL"));
        assert!(skills_in("cooking").is_none());
    }

    #[test]
    fn test_category_of() {
        assert_eq!(category_of("rust"), Some("Programming Languages"));
        assert_eq!(category_of("Kubernetes"), Some("Cloud & DevOps"));
        assert_eq!(category_of("Juggling"), None);
    }

    #[test]
    fn test_search_prefix_first() {
        let results = search("script", 10);
        let names: Vec<&str> = results.iter().map(|m| m.skill).collect();
        assert!(names.contains(&"JavaScript"));
        assert!(names.contains(&"TypeScript"));

        let results = search("re", 3);
        assert_eq!(results.len(), 3);
        assert!(results
            .iter()
            .all(|m| m.skill.to_lowercase().starts_with("re")));
    }

    #[test]
    fn test_search_empty_query() {
        assert!(search("  ", 10).is_empty());
        assert!(search("rust", 0).is_empty());
    }
}
