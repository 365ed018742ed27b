/*!
Reconciliation and link generation for two-round form assignments.

Every participant of a directory gets a personalized, prefilled link to a form.
In the first round, the link carries the code, the name and fixed instructions.
After the first round, the exported responses are matched back to the directory
by code and each participant gets a new link that also carries their first-round
writing and some feedback on its length.

```
use prefill_engine::*;
use prefill_engine::importer::ResponseRecord;

let config = LinkConfig {
    base_url: "https://forms.example.com/page?id=f1".to_string(),
    fields: FormFields {
        code: "rcode".to_string(),
        name: "rname".to_string(),
        writing: "rtext".to_string(),
        writing_info: "rinfo".to_string(),
    },
    rules: WordCountRules::DEFAULT_RULES,
    first_session_info: DEFAULT_FIRST_SESSION_INFO.to_string(),
};
config.validate()?;

let mut dir = Directory::new();
dir.insert(ParticipantRecord::new("STU001", "Alice"));
let (mut dir, _links) = generate_initial_links(dir, &config);

let responses = vec![ResponseRecord {
    raw_code: "stu001".to_string(),
    raw_name: "Alice".to_string(),
    raw_text: "A short text".to_string(),
}];
let res = reconcile(&mut dir, responses, &config);
assert_eq!(res.matched, 1);
assert_eq!(dir.get("STU001").unwrap().word_count, Some(3));
# Ok::<(), EngineError>(())
```
*/
mod config;
pub mod directory;
pub mod encoder;
pub mod importer;
pub mod lookup;
pub mod manual;
pub mod progress;
pub mod table;

use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};

pub use crate::config::*;
pub use crate::directory::{canonicalize, merge, Directory, ParticipantRecord, RecordState};
pub use crate::lookup::LinkIndex;
pub use crate::progress::LengthStatus;

use crate::importer::ResponseRecord;

// ******** Output data structures *********

/// A response that was matched to a record.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MatchedResponse {
    pub code: String,
    pub name: String,
    pub word_count: usize,
    pub status: LengthStatus,
    pub url_length: usize,
}

/// A response whose code is not in the directory.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct UnmatchedResponse {
    pub raw_code: String,
    pub raw_name: String,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReconciliationResult {
    /// The number of responses applied to the directory, duplicates included.
    pub matched: usize,
    pub updated: Vec<MatchedResponse>,
    pub unmatched: Vec<UnmatchedResponse>,
    /// The codes of the records with a response, in directory order.
    pub responded: Vec<String>,
    /// (code, name) of the records without a response, in directory order.
    pub not_responded: Vec<(String, String)>,
}

/// A first-round link.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct GeneratedLink {
    pub code: String,
    pub name: String,
    pub url: String,
}

/// Builds the first-round link of every record, in directory order.
///
/// The links only carry the code, the name and the first-round instructions.
/// Only the URLs of the directory change.
pub fn generate_initial_links(
    directory: Directory,
    config: &LinkConfig,
) -> (Directory, Vec<GeneratedLink>) {
    info!("Generating first-round links for {} participants", directory.len());
    let links: Vec<GeneratedLink> = directory
        .iter()
        .map(|r| GeneratedLink {
            code: r.code.clone(),
            name: r.name.clone(),
            url: encoder::prefilled_url(
                &config.base_url,
                &config.fields,
                &r.code,
                &r.name,
                "",
                &config.first_session_info,
                true,
            ),
        })
        .collect();
    let updates: HashMap<String, String> = links
        .iter()
        .map(|l| (l.code.clone(), l.url.clone()))
        .collect();
    (merge(directory, &updates), links)
}

/// Matches the responses to the directory and gives each matched record its
/// second-round link.
///
/// The responses are processed in order. A response with an unknown code is
/// reported and otherwise ignored. When several responses share a code, the
/// last one wins.
pub fn reconcile<I>(
    directory: &mut Directory,
    responses: I,
    config: &LinkConfig,
) -> ReconciliationResult
where
    I: IntoIterator<Item = ResponseRecord>,
{
    let mut matched: usize = 0;
    let mut updated: Vec<MatchedResponse> = Vec::new();
    let mut unmatched: Vec<UnmatchedResponse> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for response in responses {
        let code = response.canonical_code();
        let record = match directory.get_mut(&code) {
            Some(r) => r,
            None => {
                warn!(
                    "Code {:?} ({}) not found in the directory",
                    code, response.raw_name
                );
                unmatched.push(UnmatchedResponse {
                    raw_code: response.raw_code.clone(),
                    raw_name: response.raw_name.clone(),
                });
                continue;
            }
        };
        if !seen.insert(code.clone()) {
            warn!(
                "Code {:?} has more than one response, keeping the latest one",
                code
            );
        }

        let word_count = progress::word_count(&response.raw_text);
        let status = progress::length_status(word_count, &config.rules);
        let message = progress::progress_message(word_count, &config.rules);
        let name = if response.raw_name.is_empty() {
            record.name.clone()
        } else {
            response.raw_name.clone()
        };
        let url = encoder::prefilled_url(
            &config.base_url,
            &config.fields,
            &code,
            &name,
            &response.raw_text,
            &message,
            false,
        );
        info!(
            "{}: {} words: {} status: {} URL: {} characters",
            code,
            name,
            word_count,
            status.label(),
            url.len()
        );

        updated.push(MatchedResponse {
            code: code.clone(),
            name,
            word_count,
            status,
            url_length: url.len(),
        });
        record.url = Some(url);
        record.has_response = true;
        record.word_count = Some(word_count);
        matched += 1;
    }

    let responded: Vec<String> = directory
        .iter()
        .filter(|r| r.has_response)
        .map(|r| r.code.clone())
        .collect();
    let not_responded: Vec<(String, String)> = directory
        .iter()
        .filter(|r| !r.has_response)
        .map(|r| (r.code.clone(), r.name.clone()))
        .collect();
    debug!(
        "reconcile: matched {} unmatched {} responded {} not responded {}",
        matched,
        unmatched.len(),
        responded.len(),
        not_responded.len()
    );

    ReconciliationResult {
        matched,
        updated,
        unmatched,
        responded,
        not_responded,
    }
}
