//! Wire-format types for BGG XML responses.
//!
//! The BGG API nests most values in attributes, wraps names in repeated
//! elements with a `primary` marker, and omits `yearpublished` or `link`
//! entirely on some items. All of those quirks are absorbed here; the rest
//! of the crate only sees the records in [`crate::bgg::model`].

use serde::Deserialize;

use super::model::{BoardGame, CollectionGame, Link};

/// `GET /collection` response: `<items><item objectid=".."/>..</items>`.
#[derive(Debug, Deserialize)]
struct CollectionDoc {
    #[serde(rename = "item", default)]
    items: Vec<CollectionItem>,
}

#[derive(Debug, Deserialize)]
struct CollectionItem {
    #[serde(rename = "@objectid")]
    object_id: u64,
    name: TextNode,
    #[serde(rename = "yearpublished", default)]
    year_published: Option<i32>,
    #[serde(default)]
    status: StatusNode,
}

/// Element whose value is its text content, e.g. `<name sortindex="1">Catan</name>`.
#[derive(Debug, Default, Deserialize)]
struct TextNode {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Default, Deserialize)]
struct StatusNode {
    #[serde(rename = "@own", default)]
    own: String,
}

/// `GET /thing` response: `<items><item id=".."/>..</items>`.
#[derive(Debug, Deserialize)]
struct ThingDoc {
    #[serde(rename = "item", default)]
    items: Vec<ThingItem>,
}

#[derive(Debug, Deserialize)]
struct ThingItem {
    #[serde(rename = "@id")]
    id: u64,
    #[serde(rename = "name", default)]
    names: Vec<NameNode>,
    #[serde(rename = "yearpublished", default)]
    year_published: Option<ValueNode<i32>>,
    #[serde(rename = "link", default)]
    links: Vec<LinkNode>,
}

#[derive(Debug, Deserialize)]
struct NameNode {
    #[serde(rename = "@type", default)]
    name_type: String,
    #[serde(rename = "@value", default)]
    value: String,
}

/// Element whose value is an attribute, e.g. `<yearpublished value="2010"/>`.
#[derive(Debug, Deserialize)]
struct ValueNode<T> {
    #[serde(rename = "@value")]
    value: T,
}

#[derive(Debug, Deserialize)]
struct LinkNode {
    #[serde(rename = "@id")]
    id: u64,
    #[serde(rename = "@type")]
    link_type: String,
    #[serde(rename = "@value", default)]
    value: String,
}

impl From<CollectionItem> for CollectionGame {
    fn from(item: CollectionItem) -> Self {
        CollectionGame {
            id: item.object_id,
            name: item.name.value,
            year: item.year_published.unwrap_or(0),
            owned: item.status.own == "1",
        }
    }
}

impl From<ThingItem> for BoardGame {
    fn from(item: ThingItem) -> Self {
        // Items carry one primary name plus any number of alternates.
        let name = item
            .names
            .iter()
            .find(|name| name.name_type == "primary")
            .or_else(|| item.names.first())
            .map(|name| name.value.clone())
            .unwrap_or_default();

        BoardGame {
            id: item.id,
            name,
            year: item.year_published.map(|year| year.value).unwrap_or(0),
            links: item
                .links
                .into_iter()
                .map(|link| Link {
                    id: link.id,
                    link_type: link.link_type,
                    value: link.value,
                })
                .collect(),
        }
    }
}

pub(crate) fn parse_collection(body: &str) -> Result<Vec<CollectionGame>, quick_xml::DeError> {
    let doc: CollectionDoc = quick_xml::de::from_str(body)?;
    Ok(doc.items.into_iter().map(CollectionGame::from).collect())
}

pub(crate) fn parse_things(body: &str) -> Result<Vec<BoardGame>, quick_xml::DeError> {
    let doc: ThingDoc = quick_xml::de::from_str(body)?;
    Ok(doc.items.into_iter().map(BoardGame::from).collect())
}
