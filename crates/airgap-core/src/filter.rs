//! Keyword filtering of candidate lists

/// Keep the trimmed lines that contain any keyword as a substring
///
/// Matching is plain containment: `kubelet` selects
/// `https://dl.k8s.io/release/v1.28.0/bin/linux/amd64/kubelet`, and `cni`
/// selects `cni-plugins-linux-amd64-v1.3.0.tgz`. Blank lines are dropped.
pub fn filter_by_keywords<I, S>(lines: &[String], keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let keywords: Vec<S> = keywords.into_iter().collect();
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .filter(|line| keywords.iter().any(|k| line.contains(k.as_ref())))
        .map(str::to_string)
        .collect()
}
