//! Reconciliation of owned games against available expansions.
//!
//! A single sequential pipeline: owned base games, their full records,
//! candidate expansion links, candidate expansion records, owned
//! expansions, then the set difference grouped by owning base game.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::bgg::client::BggClient;
use crate::bgg::model::{GameWithExpansions, ItemType};
use crate::error::Error;
use crate::notify::Notifier;

/// The result of one reconciliation run.
///
/// Only base games with at least one unowned expansion appear; expansions
/// are listed in the order their links were discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationReport {
    pub games: Vec<GameWithExpansions>,
    pub unowned_count: usize,
}

/// Cross-references a user's collection against available expansions.
///
/// Built fresh for each run with its client and filters injected; holds no
/// state between runs.
pub struct ReconciliationService<'a> {
    client: &'a BggClient,
    game_ignore: Option<&'a HashSet<String>>,
    expansion_ignore: Option<&'a HashSet<String>>,
}

impl<'a> ReconciliationService<'a> {
    /// Creates a new instance of [`ReconciliationService`].
    pub fn new(
        client: &'a BggClient,
        game_ignore: Option<&'a HashSet<String>>,
        expansion_ignore: Option<&'a HashSet<String>>,
    ) -> Self {
        Self {
            client,
            game_ignore,
            expansion_ignore,
        }
    }

    /// Runs the full pipeline and returns the unowned-expansion report.
    pub async fn run(&self, username: &str) -> Result<ReconciliationReport, Error> {
        // 1. Owned base games. With a name filter configured only entries
        //    flagged owned pass; without one every entry passes.
        let collection = self
            .client
            .fetch_collection(
                username,
                Some(ItemType::BoardGame),
                Some(ItemType::Expansion),
            )
            .await?;
        let game_ids: Vec<u64> = match self.game_ignore {
            Some(filter) => collection
                .iter()
                .filter(|game| game.owned && !filter.contains(&game.name))
                .map(|game| game.id)
                .collect(),
            None => collection.iter().map(|game| game.id).collect(),
        };
        info!(games = game_ids.len(), "Fetched owned base games");

        // 2. Full records, including expansion links.
        let games = self.client.fetch_items(&game_ids, ItemType::BoardGame).await?;

        // 3. Candidate expansion ids mapped to their owning game.
        //    First-seen owner wins when two games link the same expansion.
        let expansion_marker = ItemType::Expansion.as_query_value();
        let mut expansion_ids: Vec<u64> = Vec::new();
        let mut owner_by_expansion: HashMap<u64, usize> = HashMap::new();
        for (game_index, game) in games.iter().enumerate() {
            for link in &game.links {
                if link.link_type != expansion_marker {
                    continue;
                }
                if let Some(filter) = self.expansion_ignore {
                    if filter.contains(&link.value) {
                        debug!(expansion = %link.value, "Skipping ignored expansion");
                        continue;
                    }
                }
                if owner_by_expansion.contains_key(&link.id) {
                    continue;
                }
                owner_by_expansion.insert(link.id, game_index);
                expansion_ids.push(link.id);
            }
        }
        info!(candidates = expansion_ids.len(), "Discovered expansion links");

        // 4. Full records for the candidates.
        let candidates = self
            .client
            .fetch_items(&expansion_ids, ItemType::Expansion)
            .await?;

        // 5. Expansions the user already owns.
        let owned_expansions = self
            .client
            .fetch_collection(username, Some(ItemType::Expansion), None)
            .await?;
        let owned_expansion_ids: HashSet<u64> = owned_expansions
            .iter()
            .filter(|expansion| expansion.owned)
            .map(|expansion| expansion.id)
            .collect();

        // 6. Diff, grouped under the owning game in discovery order.
        let mut grouped: Vec<GameWithExpansions> = Vec::new();
        let mut group_by_game: HashMap<u64, usize> = HashMap::new();
        let mut unowned_count = 0;
        for expansion in candidates {
            if owned_expansion_ids.contains(&expansion.id) {
                continue;
            }
            let Some(&game_index) = owner_by_expansion.get(&expansion.id) else {
                continue;
            };
            let game = &games[game_index];
            let slot = *group_by_game.entry(game.id).or_insert_with(|| {
                grouped.push(GameWithExpansions {
                    game: game.clone(),
                    expansions: Vec::new(),
                });
                grouped.len() - 1
            });
            grouped[slot].expansions.push(expansion);
            unowned_count += 1;
        }

        Ok(ReconciliationReport {
            games: grouped,
            unowned_count,
        })
    }

    /// Runs the pipeline, logs the findings, and hands a non-empty report
    /// to the notifier.
    ///
    /// A zero count logs "nothing found" and never invokes the notifier.
    /// Notifier delivery failures are logged without unwinding the
    /// already-computed report.
    pub async fn run_and_notify(
        &self,
        username: &str,
        notifier: &dyn Notifier,
    ) -> Result<ReconciliationReport, Error> {
        let report = self.run(username).await?;

        if report.unowned_count == 0 {
            info!("No unowned expansions found");
            return Ok(report);
        }

        for entry in &report.games {
            for expansion in &entry.expansions {
                info!(
                    "Game \"{}\" has a new expansion \"{}\" available \"{}\"",
                    entry.game.name, expansion.name, expansion.year
                );
            }
        }

        if let Err(err) = notifier.notify(&report).await {
            warn!("Failed to deliver notification: {err}");
        }

        Ok(report)
    }
}
