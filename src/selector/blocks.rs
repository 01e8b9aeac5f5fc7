//! Conversation container and message block discovery.
//!
//! Strategies from the profile run in order against the container; the
//! first one that yields at least `Options::min_blocks` blocks (after
//! nested matches are collapsed) wins.

use tracing::{debug, info};

use super::profile::{BlockStrategy, SelectorProfile};
use super::{drop_ancestors, select_all, select_first, text_len, walk_elements};
use crate::dom::DomNode;
use crate::options::Options;

/// Tags whose contents are page chrome, never conversation text.
const CHROME_TAGS: [&str; 3] = ["header", "footer", "nav"];

/// Most element children a manual-scan candidate may have.
const MANUAL_SCAN_MAX_CHILDREN: usize = 15;

/// Outcome of block discovery.
#[derive(Debug, Clone)]
pub struct Discovery<N> {
    /// The element blocks were searched in.
    pub container: N,
    /// Message blocks in document order.
    pub blocks: Vec<N>,
    /// Description of the strategy that produced `blocks`.
    pub strategy: String,
}

/// Locate the conversation container: the first profile selector with a
/// match, or `root` itself when none matches.
pub fn find_container<N: DomNode>(root: &N, profile: &SelectorProfile) -> N {
    for css in &profile.container_selectors {
        if let Some(found) = select_first(root, css) {
            debug!(selector = %css, "found conversation container");
            return found;
        }
    }
    debug!("no container selector matched, searching whole document");
    root.clone()
}

/// Run the profile's block strategies against `root`.
///
/// Returns `None` when no strategy finds enough blocks.
pub fn find_blocks<N: DomNode>(
    root: &N,
    profile: &SelectorProfile,
    options: &Options,
) -> Option<Discovery<N>> {
    let container = find_container(root, profile);

    for strategy in &profile.block_strategies {
        if let Some((blocks, label)) = run_strategy(&container, strategy, options) {
            info!(strategy = %label, blocks = blocks.len(), "found message blocks");
            return Some(Discovery {
                container,
                blocks,
                strategy: label,
            });
        }
    }

    None
}

fn run_strategy<N: DomNode>(
    container: &N,
    strategy: &BlockStrategy,
    options: &Options,
) -> Option<(Vec<N>, String)> {
    let enough = |blocks: &Vec<N>| blocks.len() >= options.min_blocks;

    match strategy {
        BlockStrategy::Selectors { selectors } => selectors.iter().find_map(|css| {
            let blocks = drop_ancestors(select_all(container, css));
            debug!(selector = %css, count = blocks.len(), "tried block selector");
            enough(&blocks).then(|| (blocks, css.clone()))
        }),

        BlockStrategy::NonEmpty { selector } => {
            let candidates = select_all(container, selector)
                .into_iter()
                .filter(|n| text_len(n) > 0 && !has_script(n))
                .collect();
            let blocks = drop_ancestors(candidates);
            enough(&blocks).then(|| (blocks, selector.clone()))
        }

        BlockStrategy::TextBearing { selector } => {
            let candidates = select_all(container, selector)
                .into_iter()
                .filter(|n| text_len(n) > options.min_text_length && !inside_chrome(n))
                .collect();
            let blocks = drop_ancestors(candidates);
            enough(&blocks).then(|| (blocks, format!("text-bearing: {selector}")))
        }

        BlockStrategy::ManualScan => {
            let blocks = manual_scan(container, options);
            enough(&blocks).then(|| (blocks, "manual-scan".to_string()))
        }
    }
}

fn has_script<N: DomNode>(node: &N) -> bool {
    select_first(node, "script").is_some()
}

fn inside_chrome<N: DomNode>(node: &N) -> bool {
    node.closest_where(|n| CHROME_TAGS.iter().any(|tag| n.is_tag(tag)))
        .is_some()
}

/// Score `div`s by text length, keep the longest, return them in document order.
fn manual_scan<N: DomNode>(container: &N, options: &Options) -> Vec<N> {
    let mut candidates: Vec<(usize, usize, N)> = walk_elements(container, options.manual_scan_depth)
        .into_iter()
        .map(|(node, _)| node)
        .filter(|n| n.is_tag("div"))
        .filter_map(|n| {
            let element_children = n.children().iter().filter(|c| c.is_element()).count();
            if element_children == 0 || element_children >= MANUAL_SCAN_MAX_CHILDREN {
                return None;
            }
            let len = text_len(&n);
            let has_paragraph = select_first(&n, "p").is_some();
            (len > options.manual_scan_min_text || has_paragraph).then_some((len, n))
        })
        .enumerate()
        .map(|(position, (len, n))| (position, len, n))
        .collect();

    debug!(candidates = candidates.len(), "manual scan candidates");

    candidates.sort_by(|a, b| b.1.cmp(&a.1));
    candidates.truncate(options.manual_scan_limit);
    candidates.sort_by_key(|(position, _, _)| *position);

    drop_ancestors(candidates.into_iter().map(|(_, _, n)| n).collect())
}
