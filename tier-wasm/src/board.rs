use std::collections::HashMap;

use tier_core::{ContainerId, ItemId, Marks, PlacementModel};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Node};

use crate::config::HostConfig;
use crate::constants::{CANDIDATE_CLASS, DRAGGING_CLASS, SELECTED_CLASS};

/// DOM handles for every item and dropzone of the host markup.
pub struct Board {
    items: HashMap<ItemId, HtmlElement>,
    zones: Vec<(ContainerId, HtmlElement)>,
}

impl Board {
    /// Read items and dropzones from the host document and build the
    /// initial placement from where each item currently sits.
    ///
    /// The bank is the dropzone with `bank_id`, or the first dropzone
    /// without an id when none has it. Other dropzones without an id get a
    /// generated `zone-<index>` id. Items outside every dropzone are moved
    /// to the end of the bank.
    pub fn scan(
        document: &Document,
        config: &HostConfig,
    ) -> Result<(Board, PlacementModel), JsValue> {
        let root = document
            .document_element()
            .ok_or_else(|| JsValue::from_str("document has no root element"))?;
        let found = query_all(&root, &config.zone_selector)?;
        let ids: Vec<String> = found.iter().map(|el| el.id()).collect();
        let bank_at = ids
            .iter()
            .position(|id| *id == config.bank_id)
            .or_else(|| ids.iter().position(|id| id.is_empty()));
        let zones: Vec<(ContainerId, HtmlElement)> = found
            .into_iter()
            .enumerate()
            .map(|(i, el)| {
                let cid = if Some(i) == bank_at {
                    ContainerId::Bank
                } else if ids[i].is_empty() {
                    ContainerId::Zone(generated_zone_id(i, &ids))
                } else {
                    ContainerId::Zone(ids[i].clone())
                };
                (cid, el)
            })
            .collect();
        let mut model = PlacementModel::new(zones.iter().map(|(c, _)| c.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let mut items = HashMap::new();
        let mut strays = Vec::new();
        for el in query_all(&root, &config.item_selector)? {
            let id = el
                .get_attribute("data-id")
                .filter(|v| !v.is_empty())
                .ok_or_else(|| JsValue::from_str("item without data-id"))?;
            let id = ItemId::new(id);
            let home = el
                .parent_element()
                .and_then(|p| p.closest(&config.zone_selector).ok().flatten())
                .and_then(|zone| {
                    let zone: Node = zone.into();
                    zones
                        .iter()
                        .find(|(_, z)| z.is_same_node(Some(&zone)))
                        .map(|(c, _)| c.clone())
                });
            match home {
                Some(home) => model
                    .insert(id.clone(), &home)
                    .map_err(|e| JsValue::from_str(&e.to_string()))?,
                None => strays.push(id.clone()),
            }
            items.insert(id, el);
        }

        let board = Board { items, zones };
        // Strays go after the items already in the bank, in document order,
        // in the DOM and in the model alike.
        for id in strays {
            if let (Some(el), Some(bank)) = (board.item(&id), board.zone(&ContainerId::Bank)) {
                bank.append_child(el)?;
                crate::utils::log(&format!("Item {id} moved into the bank"));
            }
            model
                .insert(id, &ContainerId::Bank)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
        }
        Ok((board, model))
    }

    pub fn item(&self, id: &ItemId) -> Option<&HtmlElement> {
        self.items.get(id)
    }

    pub fn zone(&self, id: &ContainerId) -> Option<&HtmlElement> {
        self.zones.iter().find(|(c, _)| c == id).map(|(_, el)| el)
    }

    pub fn items(&self) -> impl Iterator<Item = (&ItemId, &HtmlElement)> {
        self.items.iter()
    }

    pub fn zones(&self) -> impl Iterator<Item = (&ContainerId, &HtmlElement)> {
        self.zones.iter().map(|(c, el)| (c, el))
    }

    /// Append the item's element to the container's element, matching the
    /// model's "last placed is last" order.
    pub fn place(&self, item: &ItemId, container: &ContainerId) -> Result<(), JsValue> {
        let el = self
            .item(item)
            .ok_or_else(|| JsValue::from_str(&format!("no element for item {item}")))?;
        let zone = self
            .zone(container)
            .ok_or_else(|| JsValue::from_str(&format!("no element for container {container}")))?;
        zone.append_child(el)?;
        Ok(())
    }

    /// Make the CSS classes mirror the session's marks.
    pub fn apply_marks(&self, marks: &Marks<'_>) -> Result<(), JsValue> {
        for (id, el) in &self.items {
            let classes = el.class_list();
            classes.toggle_with_force(SELECTED_CLASS, marks.armed == Some(id))?;
            classes.toggle_with_force(DRAGGING_CLASS, marks.dragging == Some(id))?;
        }
        for (id, el) in &self.zones {
            el.class_list()
                .toggle_with_force(CANDIDATE_CLASS, marks.candidate == Some(id))?;
        }
        Ok(())
    }
}

/// Id for the dropzone at `index` that has none, distinct from every id on
/// the page.
fn generated_zone_id(index: usize, taken: &[String]) -> String {
    let mut id = format!("zone-{index}");
    while taken.contains(&id) {
        id.push('_');
    }
    id
}

/// `querySelectorAll` narrowed to HTML elements.
pub fn query_all(root: &Element, selector: &str) -> Result<Vec<HtmlElement>, JsValue> {
    let list = root.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<HtmlElement>().ok())
        .collect())
}
