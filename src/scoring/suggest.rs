// Keyword suggestion for job descriptions without a curated keyword list.
//
// Treats each line of the description as a separate document so words that
// recur in every bullet ("experience", "team") are downweighted and the
// distinctive skill names rise to the top.

use anyhow::Result;
use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use stop_words::{get, LANGUAGE};
use tracing::info;

/// Rank the top `count` keywords of a job description by TF-IDF.
pub fn suggest_keywords(description: &str, count: usize) -> Result<Vec<String>> {
    let lines: Vec<String> = description
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Job description is empty, cannot suggest keywords");
    }

    let stop_words: Vec<String> = get(LANGUAGE::English);
    let params = TfIdfParams::UnprocessedDocuments(&lines, &stop_words, None);
    let tfidf = TfIdf::new(params);
    let ranked: Vec<(String, f32)> = tfidf.get_ranked_word_scores(count);

    if ranked.is_empty() {
        anyhow::bail!(
            "TF-IDF produced no keywords from {} description lines",
            lines.len()
        );
    }

    info!(
        keywords = ranked.len(),
        top_keyword = &ranked[0].0,
        top_score = ranked[0].1,
        "Suggested job keywords"
    );

    Ok(ranked.into_iter().map(|(word, _)| word).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggest_returns_at_most_count() {
        let description = "Administer Oracle and PostgreSQL clusters\n\
                           Tune SQL queries and Oracle indexes\n\
                           Build ETL pipelines in Python and Spark\n\
                           Automate backups with Bash";
        let keywords = suggest_keywords(description, 5).unwrap();
        assert!(!keywords.is_empty());
        assert!(keywords.len() <= 5);
    }

    #[test]
    fn test_suggest_empty_description_fails() {
        assert!(suggest_keywords("  \n \n", 10).is_err());
    }
}
