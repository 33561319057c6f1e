//! The fixed catalog of analytical queries offered in the Queries tab.
//!
//! This is a static lookup table, not a query builder: each entry is a
//! label plus a complete SQL string in SQLite dialect.

pub struct CannedQuery {
    pub label: &'static str,
    pub sql: &'static str,
}

pub const CATALOG: &[CannedQuery] = &[
    CannedQuery {
        label: "Q1. List all artifacts from the 11th century",
        sql: "SELECT id, title, culture, century FROM artifact_metadata WHERE century = '11th century';",
    },
    CannedQuery {
        label: "Q2. Unique cultures represented",
        sql: "SELECT DISTINCT culture FROM artifact_metadata WHERE culture IS NOT NULL;",
    },
    CannedQuery {
        label: "Q3. List all artifacts from the Archaic Period",
        sql: "SELECT id, title FROM artifact_metadata WHERE period = 'Archaic';",
    },
    CannedQuery {
        label: "Q4. Titles ordered by accession year (desc)",
        sql: "SELECT title, accessionyear FROM artifact_metadata WHERE accessionyear IS NOT NULL ORDER BY accessionyear DESC;",
    },
    CannedQuery {
        label: "Q5. Artifacts per department",
        sql: "SELECT department, COUNT(*) AS artifacts FROM artifact_metadata GROUP BY department;",
    },
    CannedQuery {
        label: "Q6. Artifacts with more than 3 images",
        sql: "SELECT m.objectid FROM artifact_media m WHERE m.imagecount > 3;",
    },
    CannedQuery {
        label: "Q7. Average rank of all artifacts",
        sql: "SELECT AVG(ranks) AS avg_rank FROM artifact_media;",
    },
    CannedQuery {
        label: "Q8. Higher mediacount than colorcount",
        sql: "SELECT objectid FROM artifact_media WHERE mediacount > colorcount;",
    },
    CannedQuery {
        label: "Q9. Colors > 50%",
        sql: "SELECT objectid, color, percent FROM artifact_colors WHERE percent > 50;",
    },
    CannedQuery {
        label: "Q10. Top 10 newest accession years",
        sql: "SELECT id, title, accessionyear FROM artifact_metadata WHERE accessionyear IS NOT NULL ORDER BY accessionyear DESC LIMIT 10;",
    },
    CannedQuery {
        label: "Q11. Distinct hues",
        sql: "SELECT DISTINCT hue FROM artifact_colors WHERE hue IS NOT NULL ORDER BY hue;",
    },
    CannedQuery {
        label: "Q12. Top 5 most used colors",
        sql: "SELECT color, COUNT(*) AS color_count FROM artifact_colors GROUP BY color ORDER BY color_count DESC LIMIT 5;",
    },
    CannedQuery {
        label: "Q13. Average coverage per hue",
        sql: "SELECT hue, AVG(percent) AS avg_coverage FROM artifact_colors GROUP BY hue;",
    },
    CannedQuery {
        label: "Q14. Colors for a given artifact ID",
        sql: "SELECT color, spectrum, hue, percent, css3 FROM artifact_colors WHERE objectid = 12345;",
    },
    CannedQuery {
        label: "Q15. Total number of color entries",
        sql: "SELECT COUNT(*) AS total_color_entries FROM artifact_colors;",
    },
    CannedQuery {
        label: "Q16. Artifact titles and hues (Byzantine culture)",
        sql: "SELECT a.title, c.hue FROM artifact_metadata a JOIN artifact_colors c ON a.id = c.objectid WHERE a.culture = 'Byzantine';",
    },
    CannedQuery {
        label: "Q17. Each artifact title with hues",
        sql: "SELECT a.title, GROUP_CONCAT(c.hue) AS hues FROM artifact_metadata a JOIN artifact_colors c ON a.id = c.objectid WHERE c.hue IS NOT NULL GROUP BY a.title;",
    },
    CannedQuery {
        label: "Q18. Titles, cultures, media ranks (period not null)",
        sql: "SELECT a.title, a.culture, b.ranks FROM artifact_metadata a JOIN artifact_media b ON a.id = b.objectid WHERE a.period IS NOT NULL;",
    },
    CannedQuery {
        label: "Q19. Top 10 ranked artifacts with hue Grey",
        sql: "SELECT a.title, c.hue, b.ranks FROM artifact_metadata a JOIN artifact_media b ON a.id = b.objectid JOIN artifact_colors c ON a.id = c.objectid WHERE c.hue = 'Grey' ORDER BY b.ranks DESC LIMIT 10;",
    },
    CannedQuery {
        label: "Q20. Artifacts per classification with avg media count",
        sql: "SELECT a.classification, COUNT(*) AS artifact_count, AVG(b.mediacount) AS avg_media_count FROM artifact_metadata a JOIN artifact_media b ON a.id = b.objectid GROUP BY a.classification;",
    },
    CannedQuery {
        label: "Q21. Byzantine artifacts by centuries (desc)",
        sql: "SELECT title, culture, century FROM artifact_metadata WHERE culture = 'Byzantine' ORDER BY century DESC;",
    },
    CannedQuery {
        label: "Q22. Top 5 cultures with most artifacts",
        sql: "SELECT culture, COUNT(*) AS artifact_count FROM artifact_metadata GROUP BY culture ORDER BY artifact_count DESC LIMIT 5;",
    },
    CannedQuery {
        label: "Q23. Earliest and latest accession year",
        sql: "SELECT MIN(accessionyear) AS earliest_year, MAX(accessionyear) AS latest_year FROM artifact_metadata WHERE accessionyear != 0;",
    },
    CannedQuery {
        label: "Q24. Classification with highest avg color count",
        sql: "SELECT a.classification, AVG(b.colorcount) AS avg_colorcount FROM artifact_metadata a JOIN artifact_media b ON a.id = b.objectid GROUP BY a.classification ORDER BY avg_colorcount DESC;",
    },
    CannedQuery {
        label: "Q25. Classification with top avg color count (limit 1)",
        sql: "SELECT a.classification, AVG(b.colorcount) AS avg_colorcount FROM artifact_metadata a JOIN artifact_media b ON a.id = b.objectid GROUP BY a.classification ORDER BY avg_colorcount DESC LIMIT 1;",
    },
    CannedQuery {
        label: "Q26. Average accession year per classification",
        sql: "SELECT classification, AVG(accessionyear) AS avg_accessionyear FROM artifact_metadata GROUP BY classification;",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_26_unique_entries() {
        assert_eq!(CATALOG.len(), 26);
        let labels: HashSet<&str> = CATALOG.iter().map(|q| q.label).collect();
        assert_eq!(labels.len(), CATALOG.len());
    }

    #[test]
    fn test_every_query_runs_against_the_schema() {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();

        for query in CATALOG {
            let result = db.run_query(query.sql);
            assert!(result.is_ok(), "{} failed: {:?}", query.label, result.err());
        }
    }
}
