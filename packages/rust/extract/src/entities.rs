//! Flat bullet runs regrouped into nested entities.
//!
//! Generative output tends to flatten repeated structures into one
//! bulleted run: a heading-like line opens each entity and the lines
//! after it carry that entity's attributes. The heading classifier is
//! fuzzy by necessity: an all-caps multi-word left-hand side, or an
//! institutional keyword anywhere in it.

use indexmap::IndexMap;
use toolcard_shared::Entity;

use crate::value::bullet_content;

/// Keywords that mark a left-hand side as an entity title even when it is
/// not written in all caps.
const INSTITUTION_KEYWORDS: &[&str] = &[
    "hospital",
    "clinic",
    "medical centre",
    "medical center",
    "health service",
    "institute",
    "infirmary",
];

/// Regroup a flat bulleted run into entities.
///
/// Attribute lines before the first title open an anonymous entity so
/// their content is not dropped. Returns an empty vec only when no bullet
/// carries usable content; the caller then falls back to a plain list.
pub(crate) fn group_entities(raw: &str) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut open: Option<Entity> = None;

    for line in raw.lines() {
        let Some(content) = bullet_content(line.trim()) else {
            continue;
        };
        let content = content.trim();
        if content.is_empty() {
            continue;
        }

        let (lhs, rhs) = match content.split_once(':') {
            Some((left, right)) => (left.trim(), Some(right.trim())),
            None => (content, None),
        };

        if starts_new_entity(lhs) {
            if let Some(entity) = open.take() {
                push_entity(&mut entities, entity);
            }
            open = Some(Entity {
                title: lhs.to_string(),
                template: rhs.filter(|r| !r.is_empty()).map(str::to_string),
                attributes: IndexMap::new(),
            });
        } else {
            let entity = open.get_or_insert_with(Entity::default);
            entity
                .attributes
                .insert(lhs.to_lowercase(), rhs.unwrap_or("").to_string());
        }
    }

    if let Some(entity) = open.take() {
        push_entity(&mut entities, entity);
    }
    entities
}

/// Entities with neither a title nor any attribute are discarded.
fn push_entity(entities: &mut Vec<Entity>, entity: Entity) {
    if entity.title.is_empty() && entity.attributes.is_empty() {
        return;
    }
    entities.push(entity);
}

/// A left-hand side opens a new entity when it reads like a heading:
/// all caps with at least two words, or an institutional keyword match.
fn starts_new_entity(lhs: &str) -> bool {
    if lhs.split_whitespace().count() >= 2 && lhs.to_uppercase() == lhs {
        return true;
    }
    let lower = lhs.to_lowercase();
    INSTITUTION_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
}
