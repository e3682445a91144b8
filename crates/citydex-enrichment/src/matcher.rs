use citydex_core::CountryDirectoryEntry;

/// Resolves a country name against the directory.
///
/// The name is trimmed and case-folded, then matched in two passes over the
/// directory in order: the first entry whose common or official name equals
/// it wins; only if none does, the first entry whose common or official name
/// contains it is returned. A blank name matches nothing.
pub fn find_country<'a>(
    directory: &'a [CountryDirectoryEntry],
    name: &str,
) -> Option<&'a CountryDirectoryEntry> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let names = |entry: &CountryDirectoryEntry| {
        [
            entry.name.common.to_lowercase(),
            entry.name.official.to_lowercase(),
        ]
    };

    directory
        .iter()
        .find(|entry| names(entry).iter().any(|candidate| *candidate == needle))
        .or_else(|| {
            directory.iter().find(|entry| {
                names(entry)
                    .iter()
                    .any(|candidate| candidate.contains(needle.as_str()))
            })
        })
}
