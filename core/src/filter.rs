//! Allow-list filtering of definition maps.

use std::collections::BTreeMap;

/// Schema keys describing workload controllers.
///
/// `--controller-only` narrows the output document to exactly these keys.
pub const WORKLOAD_KEYS: &[&str] = &[
    "io.kedge.DeploymentSpecMod",
    "io.kedge.DeploymentConfigSpecMod",
    "io.kedge.JobSpecMod",
];

/// Removes every entry whose key is not in `allow`; with no allow-list the
/// map is left untouched.
///
/// Filtering is a pure key subtraction: references from surviving entries to
/// removed ones are not rewritten, so filtered output may contain dangling
/// `$ref` pointers. Callers that filter accept that.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use schemagen_core::retain_keys;
///
/// let mut definitions = BTreeMap::from([
///     ("io.kedge.AppSpec".to_string(), 1),
///     ("io.kedge.PodSpecMod".to_string(), 2),
/// ]);
/// retain_keys(&mut definitions, Some(["io.kedge.AppSpec"].as_slice()));
/// assert_eq!(definitions.len(), 1);
/// assert!(definitions.contains_key("io.kedge.AppSpec"));
/// ```
pub fn retain_keys<V, S: AsRef<str>>(
    definitions: &mut BTreeMap<String, V>,
    allow: Option<&[S]>,
) {
    let Some(allow) = allow else {
        return;
    };
    definitions.retain(|key, _| allow.iter().any(|candidate| candidate.as_ref() == key));
}
