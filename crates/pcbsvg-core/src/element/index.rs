//! Id lookup over one circuit document.
//!
//! Records refer to each other by string id. [`ElementIndex`] maps each id
//! kind to the position of its record in the element slice, so relations
//! resolve in constant time without the records owning each other.

use indexmap::{IndexMap, IndexSet};
use log::warn;

use crate::element::{Board, Component, Element, Group, Panel, Port, SourceTrace};

/// Per-call id index into a borrowed element slice.
#[derive(Debug)]
pub struct ElementIndex<'a> {
    elements: &'a [Element],
    board_positions: Vec<usize>,
    boards: IndexMap<&'a str, usize>,
    panels: IndexMap<&'a str, usize>,
    groups: IndexMap<&'a str, usize>,
    components: IndexMap<&'a str, usize>,
    ports: IndexMap<&'a str, usize>,
    ports_by_source: IndexMap<&'a str, usize>,
    routed_source_traces: IndexSet<&'a str>,
}

impl<'a> ElementIndex<'a> {
    /// Indexes every id-carrying record of `elements`.
    ///
    /// When an id appears twice the first record wins.
    pub fn new(elements: &'a [Element]) -> Self {
        let mut index = Self {
            elements,
            board_positions: Vec::new(),
            boards: IndexMap::new(),
            panels: IndexMap::new(),
            groups: IndexMap::new(),
            components: IndexMap::new(),
            ports: IndexMap::new(),
            ports_by_source: IndexMap::new(),
            routed_source_traces: IndexSet::new(),
        };

        for (position, element) in elements.iter().enumerate() {
            match element {
                Element::Board(board) => {
                    index.board_positions.push(position);
                    if let Some(id) = board.pcb_board_id.as_deref() {
                        index.boards.entry(id).or_insert(position);
                    }
                }
                Element::Panel(panel) => {
                    if let Some(id) = panel.pcb_panel_id.as_deref() {
                        index.panels.entry(id).or_insert(position);
                    }
                }
                Element::Group(group) => {
                    index.groups.entry(group.pcb_group_id.as_str()).or_insert(position);
                }
                Element::Component(component) => {
                    index
                        .components
                        .entry(component.pcb_component_id.as_str())
                        .or_insert(position);
                }
                Element::Port(port) => {
                    index.ports.entry(port.pcb_port_id.as_str()).or_insert(position);
                    if let Some(source) = port.source_port_id.as_deref() {
                        index.ports_by_source.entry(source).or_insert(position);
                    }
                }
                Element::Trace(trace) => {
                    if let Some(source) = trace.source_trace_id.as_deref() {
                        index.routed_source_traces.insert(source);
                    }
                }
                _ => {}
            }
        }

        index
    }

    pub fn elements(&self) -> &'a [Element] {
        self.elements
    }

    pub fn board(&self, id: &str) -> Option<&'a Board> {
        match self.elements.get(*self.boards.get(id)?)? {
            Element::Board(board) => Some(board),
            _ => None,
        }
    }

    pub fn panel(&self, id: &str) -> Option<&'a Panel> {
        match self.elements.get(*self.panels.get(id)?)? {
            Element::Panel(panel) => Some(panel),
            _ => None,
        }
    }

    pub fn group(&self, id: &str) -> Option<&'a Group> {
        match self.elements.get(*self.groups.get(id)?)? {
            Element::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn component(&self, id: &str) -> Option<&'a Component> {
        match self.elements.get(*self.components.get(id)?)? {
            Element::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn port(&self, id: &str) -> Option<&'a Port> {
        match self.elements.get(*self.ports.get(id)?)? {
            Element::Port(port) => Some(port),
            _ => None,
        }
    }

    /// The placed port realizing a `source_port_id`.
    pub fn port_for_source(&self, source_port_id: &str) -> Option<&'a Port> {
        match self.elements.get(*self.ports_by_source.get(source_port_id)?)? {
            Element::Port(port) => Some(port),
            _ => None,
        }
    }

    /// Every board, in document order, with or without an id.
    pub fn boards(&self) -> impl Iterator<Item = &'a Board> + '_ {
        self.board_positions.iter().filter_map(|position| match self.elements.get(*position) {
            Some(Element::Board(board)) => Some(board),
            _ => None,
        })
    }

    /// Every group, in document order.
    pub fn groups(&self) -> impl Iterator<Item = &'a Group> + '_ {
        self.groups.values().filter_map(|position| match self.elements.get(*position) {
            Some(Element::Group(group)) => Some(group),
            _ => None,
        })
    }

    /// Walks from `group_id` up through its parent groups.
    ///
    /// The walk stops at a missing id and at the first revisited id, which
    /// is reported as a cycle, so the returned chain never repeats a group.
    pub fn group_chain(&self, group_id: &str) -> Vec<&'a Group> {
        let mut visited = IndexSet::new();
        let mut chain = Vec::new();
        let mut next = Some(group_id);
        while let Some(id) = next {
            let Some(group) = self.group(id) else {
                break;
            };
            if !visited.insert(group.pcb_group_id.as_str()) {
                warn!(pcb_group_id = id; "Group parent chain contains a cycle");
                break;
            }
            chain.push(group);
            next = group.parent_pcb_group_id.as_deref();
        }
        chain
    }

    /// The board a group belongs to, found along its parent chain.
    pub fn board_of_group(&self, group_id: &str) -> Option<&'a Board> {
        self.group_chain(group_id)
            .into_iter()
            .find_map(|group| group.pcb_board_id.as_deref())
            .and_then(|board_id| self.board(board_id))
    }

    /// The panel a board sits on.
    pub fn panel_of_board(&self, board: &Board) -> Option<&'a Panel> {
        self.panel(board.pcb_panel_id.as_deref()?)
    }

    /// Components whose group is `group_id`, directly or through nested groups.
    pub fn components_in_group(&self, group_id: &str) -> Vec<&'a Component> {
        self.components
            .values()
            .filter_map(|position| match self.elements.get(*position) {
                Some(Element::Component(component)) => Some(component),
                _ => None,
            })
            .filter(|component| {
                component.pcb_group_id.as_deref().is_some_and(|member_of| {
                    self.group_chain(member_of)
                        .iter()
                        .any(|group| group.pcb_group_id == group_id)
                })
            })
            .collect()
    }

    /// Returns `true` if some `pcb_trace` realizes the source trace.
    pub fn is_routed(&self, source_trace: &SourceTrace) -> bool {
        self.routed_source_traces
            .contains(source_trace.source_trace_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn elements(value: serde_json::Value) -> Vec<Element> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_lookup_by_id() {
        let elements = elements(json!([
            {"type": "pcb_panel", "pcb_panel_id": "panel", "center": {"x": 0, "y": 0}, "width": 50, "height": 50},
            {"type": "pcb_board", "pcb_board_id": "b1", "pcb_panel_id": "panel", "center": {"x": 0, "y": 0}, "width": 10, "height": 10},
            {"type": "pcb_component", "pcb_component_id": "c1", "center": {"x": 1, "y": 1}},
            {"type": "pcb_port", "pcb_port_id": "p1", "source_port_id": "sp1", "x": 1, "y": 1}
        ]));
        let index = ElementIndex::new(&elements);

        let board = index.board("b1").unwrap();
        assert!(index.panel_of_board(board).is_some());
        assert!(index.component("c1").is_some());
        assert_eq!(index.port_for_source("sp1").unwrap().pcb_port_id, "p1");
        assert!(index.board("missing").is_none());
        assert_eq!(index.boards().count(), 1);
    }

    #[test]
    fn test_boards_without_id_are_listed() {
        let elements = elements(json!([
            {"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 10, "height": 10},
            {"type": "pcb_board", "pcb_board_id": "b1", "center": {"x": 20, "y": 0}, "width": 4, "height": 4},
            {"type": "pcb_board", "center": {"x": 40, "y": 0}, "width": 6, "height": 6}
        ]));
        let index = ElementIndex::new(&elements);

        let widths: Vec<f64> = index
            .boards()
            .filter_map(|board| board.rect())
            .map(|rect| rect.width())
            .collect();
        assert_eq!(widths, vec![10.0, 4.0, 6.0]);
        assert!(index.board("b1").is_some());
    }

    #[test]
    fn test_group_chain_stops_on_cycle() {
        let elements = elements(json!([
            {"type": "pcb_group", "pcb_group_id": "a", "parent_pcb_group_id": "b"},
            {"type": "pcb_group", "pcb_group_id": "b", "parent_pcb_group_id": "a"}
        ]));
        let index = ElementIndex::new(&elements);

        let chain = index.group_chain("a");
        let ids: Vec<&str> = chain.iter().map(|g| g.pcb_group_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_nested_group_membership_and_board() {
        let elements = elements(json!([
            {"type": "pcb_board", "pcb_board_id": "b1", "center": {"x": 0, "y": 0}, "width": 10, "height": 10},
            {"type": "pcb_group", "pcb_group_id": "outer", "pcb_board_id": "b1"},
            {"type": "pcb_group", "pcb_group_id": "inner", "parent_pcb_group_id": "outer"},
            {"type": "pcb_component", "pcb_component_id": "c1", "pcb_group_id": "inner", "center": {"x": 0, "y": 0}},
            {"type": "pcb_component", "pcb_component_id": "c2", "center": {"x": 0, "y": 0}}
        ]));
        let index = ElementIndex::new(&elements);

        assert_eq!(index.components_in_group("outer").len(), 1);
        assert_eq!(index.components_in_group("inner").len(), 1);
        assert!(index.board_of_group("inner").is_some());
        assert!(index.components_in_group("missing").is_empty());
    }

    #[test]
    fn test_routed_source_traces() {
        let elements = elements(json!([
            {"type": "source_trace", "source_trace_id": "st1", "connected_source_port_ids": []},
            {"type": "source_trace", "source_trace_id": "st2", "connected_source_port_ids": []},
            {"type": "pcb_trace", "source_trace_id": "st1", "route": []}
        ]));
        let index = ElementIndex::new(&elements);
        let traces: Vec<&SourceTrace> = elements
            .iter()
            .filter_map(|element| match element {
                Element::SourceTrace(trace) => Some(trace),
                _ => None,
            })
            .collect();
        assert!(index.is_routed(traces[0]));
        assert!(!index.is_routed(traces[1]));
    }
}
