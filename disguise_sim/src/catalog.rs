//! Actor type catalog: tooltips, sprites, targetable types and disguise profiles.
//!
//! Loaded from `actor_catalog.json` with support for an environment variable
//! override. Every instance of an actor type shares the same `Arc`'d template,
//! so profiles are read-only once the catalog is built.

use std::{
    collections::{BTreeSet, HashMap},
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use bevy::prelude::Resource;
use serde::Deserialize;
use thiserror::Error;

use crate::components::SpriteKey;
use crate::players::Relationship;

pub const BUILTIN_ACTOR_CATALOG: &str = include_str!("data/actor_catalog.json");

/// Environment variable naming a catalog file that replaces the builtin one.
pub const ACTOR_CATALOG_PATH_VAR: &str = "ACTOR_CATALOG_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorTypeId(pub String);

impl ActorTypeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Description shown when hovering an actor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TooltipInfo {
    pub name: String,
    #[serde(default)]
    pub generic_name: Option<String>,
}

impl TooltipInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generic_name: None,
        }
    }
}

/// Simulation events that can force an active disguise to drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealTrigger {
    Attack,
    Damaged,
    Unload,
    Infiltrate,
    Demolish,
}

/// Per-actor-type disguise configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisguiseProfile {
    /// Condition granted while the disguise is up.
    pub condition: Option<String>,
    pub reveal_on: BTreeSet<RevealTrigger>,
    pub voice: String,
    pub target_types: BTreeSet<String>,
    pub valid_relationships: Relationship,
}

impl Default for DisguiseProfile {
    fn default() -> Self {
        Self {
            condition: None,
            reveal_on: BTreeSet::from([RevealTrigger::Attack]),
            voice: "Action".to_string(),
            target_types: BTreeSet::from(["Disguise".to_string()]),
            valid_relationships: Relationship::all(),
        }
    }
}

impl DisguiseProfile {
    pub fn reveals_on(&self, trigger: RevealTrigger) -> bool {
        self.reveal_on.contains(&trigger)
    }
}

#[derive(Debug, Clone)]
pub struct ActorTemplate {
    pub id: ActorTypeId,
    pub tooltip: Arc<TooltipInfo>,
    image: Option<String>,
    faction_images: HashMap<String, String>,
    pub targetable: BTreeSet<String>,
    pub detects_disguise: bool,
    pub disguise: Option<Arc<DisguiseProfile>>,
}

impl ActorTemplate {
    /// Sprite for this actor type as fielded by the given faction.
    ///
    /// Falls back to the template's default image, then to the type id.
    pub fn image_for(&self, faction: Option<&str>) -> SpriteKey {
        let image = faction
            .and_then(|faction| self.faction_images.get(faction))
            .or(self.image.as_ref())
            .cloned()
            .unwrap_or_else(|| self.id.0.clone());
        SpriteKey(image)
    }
}

#[derive(Debug, Deserialize)]
struct ActorCatalogFile {
    actors: Vec<ActorTemplateSpec>,
}

#[derive(Debug, Deserialize)]
struct ActorTemplateSpec {
    id: String,
    tooltip: TooltipInfo,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    faction_images: HashMap<String, String>,
    #[serde(default)]
    targetable: BTreeSet<String>,
    #[serde(default)]
    detects_disguise: bool,
    #[serde(default)]
    disguise: Option<DisguiseProfile>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read actor catalog from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse actor catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("actor catalog entry has an empty id")]
    EmptyId,
    #[error("duplicate actor id '{0}'")]
    DuplicateActor(String),
}

/// Immutable set of actor templates keyed by type id.
#[derive(Debug, Clone, Default)]
pub struct ActorCatalog {
    templates: HashMap<ActorTypeId, Arc<ActorTemplate>>,
    order: Vec<ActorTypeId>,
}

impl ActorCatalog {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            Self::from_json_str(BUILTIN_ACTOR_CATALOG)
                .expect("builtin actor catalog should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: ActorCatalogFile = serde_json::from_str(json)?;
        let mut catalog = ActorCatalog::default();
        for spec in file.actors {
            if spec.id.trim().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            let id = ActorTypeId::new(spec.id);
            if catalog.templates.contains_key(&id) {
                return Err(CatalogError::DuplicateActor(id.0));
            }
            let template = ActorTemplate {
                id: id.clone(),
                tooltip: Arc::new(spec.tooltip),
                image: spec.image,
                faction_images: spec.faction_images,
                targetable: spec.targetable,
                detects_disguise: spec.detects_disguise,
                disguise: spec.disguise.map(Arc::new),
            };
            catalog.order.push(id.clone());
            catalog.templates.insert(id, Arc::new(template));
        }
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<ActorTemplate>> {
        self.templates.get(&ActorTypeId::new(id))
    }

    /// Templates in declaration order.
    pub fn templates(&self) -> impl Iterator<Item = &Arc<ActorTemplate>> {
        self.order.iter().filter_map(|id| self.templates.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Resource, Debug, Clone)]
pub struct ActorCatalogHandle(Arc<ActorCatalog>);

impl ActorCatalogHandle {
    pub fn new(catalog: Arc<ActorCatalog>) -> Self {
        Self(catalog)
    }

    pub fn get(&self) -> Arc<ActorCatalog> {
        Arc::clone(&self.0)
    }
}

/// Where the active catalog came from. `None` means the builtin data.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActorCatalogMetadata {
    path: Option<PathBuf>,
}

impl ActorCatalogMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

/// Load the actor catalog named by `ACTOR_CATALOG_PATH`, falling back to the builtin data.
pub fn load_actor_catalog_from_env() -> (Arc<ActorCatalog>, ActorCatalogMetadata) {
    let override_path = env::var(ACTOR_CATALOG_PATH_VAR).ok().map(PathBuf::from);
    load_actor_catalog(override_path.as_deref())
}

pub fn load_actor_catalog(path: Option<&Path>) -> (Arc<ActorCatalog>, ActorCatalogMetadata) {
    if let Some(path) = path {
        match ActorCatalog::from_file(path) {
            Ok(catalog) => {
                tracing::info!(
                    target: "disguise::config",
                    path = %path.display(),
                    actors = catalog.len(),
                    "actor_catalog.loaded=file"
                );
                return (
                    Arc::new(catalog),
                    ActorCatalogMetadata::new(Some(path.to_path_buf())),
                );
            }
            Err(err) => {
                tracing::warn!(
                    target: "disguise::config",
                    path = %path.display(),
                    error = %err,
                    "actor_catalog.load_failed"
                );
            }
        }
    }

    let catalog = ActorCatalog::builtin();
    tracing::info!(
        target: "disguise::config",
        actors = catalog.len(),
        "actor_catalog.loaded=builtin"
    );
    (catalog, ActorCatalogMetadata::new(None))
}
