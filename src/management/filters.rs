use std::{collections::HashSet, path::Path};

use crate::engine::FilterSets;

pub const WHITELIST_FILE: &str = "whitelist.txt";
pub const BLACKLIST_FILE: &str = "blacklist.txt";

/// One section title per line; blank lines are ignored. A file without any
/// title counts as not configured.
pub fn parse_titles(content: &str) -> Option<HashSet<String>> {
    let titles: HashSet<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    (!titles.is_empty()).then_some(titles)
}

async fn load_titles(path: &Path) -> Result<Option<HashSet<String>>, std::io::Error> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = async_fs::read_to_string(path).await?;
    Ok(parse_titles(&content))
}

/// Reads the whitelist and blacklist files from a user directory.
pub async fn load_filter_sets(user_dir: &Path) -> Result<FilterSets, std::io::Error> {
    Ok(FilterSets {
        whitelist: load_titles(&user_dir.join(WHITELIST_FILE)).await?,
        blacklist: load_titles(&user_dir.join(BLACKLIST_FILE)).await?,
    })
}
