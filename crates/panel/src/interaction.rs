//! Interaction State Machine, one independent instance per pointer.
//!
//! ```text
//! Idle --hit--> Hovering(e) --press--> Pressing(e) --release--> Hovering(e) | Idle
//! ```
//!
//! Hover is re-evaluated only while the pointer is not held, so a press keeps
//! its element captured until release even if the ray drifts off it.

use canvasui_core::{Point, PointerIndex, SurfaceSize, SurfaceUv};

use crate::document::Document;
use crate::events::PanelEvent;
use crate::hit_test::hit_test;
use crate::layout::effective_max_scroll;
use crate::state::{DirtyFlag, PointerState, ScrollAnchor};

/// One pointer's input for a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    /// Surface point under the pointer, `None` when it misses the panel.
    pub point: Option<Point>,
    /// Whether the select button/trigger is held.
    pub pressed: bool,
}

impl PointerInput {
    /// Pointer over `point`.
    pub fn at(x: f32, y: f32, pressed: bool) -> Self {
        Self {
            point: Some(Point::new(x, y)),
            pressed,
        }
    }

    /// Pointer off the panel.
    pub fn away() -> Self {
        Self::default()
    }

    /// Pointer at a plane UV, mapped to surface pixels.
    pub fn from_uv(uv: Option<SurfaceUv>, surface: SurfaceSize, pressed: bool) -> Self {
        Self {
            point: uv.map(|uv| uv.to_surface(surface)),
            pressed,
        }
    }
}

/// Advance `pointer`'s machine by one tick, appending observed events.
pub(crate) fn step_pointer(
    pointer: PointerIndex,
    input: PointerInput,
    slot: &mut PointerState,
    doc: &mut Document,
    dirty: &mut DirtyFlag,
    events: &mut Vec<PanelEvent>,
) {
    let was_pressed = slot.pressed;

    if !was_pressed {
        update_hover(pointer, input.point, slot, doc, dirty, events);
    }

    match (was_pressed, input.pressed) {
        (false, true) => press(pointer, input.point, slot, doc, dirty, events),
        (true, true) => drag(input.point, slot, doc, dirty),
        (true, false) => release(pointer, slot, dirty),
        (false, false) => {}
    }
}

fn update_hover(
    pointer: PointerIndex,
    point: Option<Point>,
    slot: &mut PointerState,
    doc: &Document,
    dirty: &mut DirtyFlag,
    events: &mut Vec<PanelEvent>,
) {
    let hit = point.and_then(|p| hit_test(&doc.config, &doc.content, &doc.layout, p));
    if hit == slot.selected.as_deref() {
        return;
    }
    let hit = hit.map(str::to_string);
    if let Some(previous) = slot.selected.take() {
        events.push(PanelEvent::HoverChanged {
            pointer,
            element: previous,
            hovered: false,
        });
    }
    if let Some(next) = &hit {
        events.push(PanelEvent::HoverChanged {
            pointer,
            element: next.clone(),
            hovered: true,
        });
    }
    tracing::debug!(pointer = pointer.get(), selected = ?hit, "hover changed");
    slot.selected = hit;
    dirty.mark();
}

fn press(
    pointer: PointerIndex,
    point: Option<Point>,
    slot: &mut PointerState,
    doc: &Document,
    dirty: &mut DirtyFlag,
    events: &mut Vec<PanelEvent>,
) {
    slot.pressed = true;
    slot.scroll_anchor = None;
    let Some(name) = slot.selected.clone() else {
        return;
    };
    dirty.mark();
    if let (Some(element), Some(point)) = (doc.config.elements.get(&name), point) {
        if element.scrolls() {
            slot.scroll_anchor = Some(ScrollAnchor {
                scroll_y: element.scroll_y.unwrap_or(0.0),
                ray_y: point.y,
            });
        }
    }
    tracing::debug!(pointer = pointer.get(), element = %name, "press");
    events.push(PanelEvent::Clicked {
        pointer,
        element: name,
    });
}

fn drag(point: Option<Point>, slot: &PointerState, doc: &mut Document, dirty: &mut DirtyFlag) {
    let (Some(anchor), Some(point), Some(name)) = (slot.scroll_anchor, point, slot.selected.as_deref())
    else {
        return;
    };
    let Some(element) = doc.config.elements.get(name) else {
        return;
    };
    if !element.scrolls() {
        return;
    }
    let max_scroll = effective_max_scroll(name, element, &doc.layout);
    let dy = anchor.ray_y - point.y;
    let scroll_y = (anchor.scroll_y + dy).clamp(0.0, max_scroll);
    if let Some(element) = doc.config.elements.get_mut(name) {
        if element.scroll_y != Some(scroll_y) {
            element.scroll_y = Some(scroll_y);
            dirty.mark();
        }
    }
}

fn release(pointer: PointerIndex, slot: &mut PointerState, dirty: &mut DirtyFlag) {
    slot.pressed = false;
    slot.scroll_anchor = None;
    if slot.selected.is_some() {
        dirty.mark();
    }
    tracing::debug!(pointer = pointer.get(), "release");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementConfig, ElementKind, Overflow, PanelConfig};

    struct Rig {
        doc: Document,
        slot: PointerState,
        dirty: DirtyFlag,
    }

    impl Rig {
        fn new(config: PanelConfig) -> Self {
            Self {
                doc: Document::new(config),
                slot: PointerState::default(),
                dirty: DirtyFlag::default(),
            }
        }

        fn step(&mut self, input: PointerInput) -> Vec<PanelEvent> {
            let mut events = Vec::new();
            step_pointer(
                PointerIndex::PRIMARY,
                input,
                &mut self.slot,
                &mut self.doc,
                &mut self.dirty,
                &mut events,
            );
            events
        }

        fn scroll_y(&self, name: &str) -> Option<f32> {
            self.doc.config.elements[name].scroll_y
        }
    }

    fn button_panel() -> PanelConfig {
        PanelConfig::new(ElementConfig::default()).with_element(
            "btn",
            ElementConfig::new(ElementKind::Button, 0.0, 0.0).with_size(100.0, 40.0),
        )
    }

    fn scroll_panel(max_scroll: f32, scroll_y: f32) -> PanelConfig {
        let mut list = ElementConfig::new(ElementKind::Text, 0.0, 0.0)
            .with_size(400.0, 400.0)
            .with_overflow(Overflow::Scroll);
        list.max_scroll = Some(max_scroll);
        list.scroll_y = Some(scroll_y);
        PanelConfig::new(ElementConfig::default()).with_element("list", list)
    }

    fn clicks(events: &[PanelEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, PanelEvent::Clicked { .. }))
            .count()
    }

    #[test]
    fn hover_enter_and_leave() {
        let mut rig = Rig::new(button_panel());
        let events = rig.step(PointerInput::at(50.0, 20.0, false));
        assert_eq!(
            events,
            vec![PanelEvent::HoverChanged {
                pointer: PointerIndex::PRIMARY,
                element: "btn".into(),
                hovered: true
            }]
        );
        assert_eq!(rig.slot.selected.as_deref(), Some("btn"));

        assert!(rig.step(PointerInput::at(60.0, 20.0, false)).is_empty());

        let events = rig.step(PointerInput::away());
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], PanelEvent::HoverChanged { hovered: false, .. }));
        assert_eq!(rig.slot.selected, None);
    }

    #[test]
    fn click_fires_once_per_press_edge() {
        let mut rig = Rig::new(button_panel());
        let mut total = 0;
        total += clicks(&rig.step(PointerInput::at(50.0, 20.0, true)));
        for _ in 0..5 {
            total += clicks(&rig.step(PointerInput::at(50.0, 20.0, true)));
        }
        assert_eq!(total, 1);

        total += clicks(&rig.step(PointerInput::at(50.0, 20.0, false)));
        total += clicks(&rig.step(PointerInput::at(50.0, 20.0, true)));
        assert_eq!(total, 2);
    }

    #[test]
    fn press_on_empty_space_clicks_nothing() {
        let mut rig = Rig::new(button_panel());
        let events = rig.step(PointerInput::at(500.0, 500.0, true));
        assert_eq!(clicks(&events), 0);
        assert!(rig.slot.pressed);
    }

    #[test]
    fn selection_is_captured_while_held() {
        let mut rig = Rig::new(button_panel());
        rig.step(PointerInput::at(50.0, 20.0, true));
        let events = rig.step(PointerInput::at(500.0, 500.0, true));
        assert!(events.is_empty());
        assert_eq!(rig.slot.selected.as_deref(), Some("btn"));

        // Release tick keeps the selection; the next tick re-evaluates.
        rig.step(PointerInput::at(500.0, 500.0, false));
        assert_eq!(rig.slot.selected.as_deref(), Some("btn"));
        let events = rig.step(PointerInput::at(500.0, 500.0, false));
        assert_eq!(events.len(), 1);
        assert_eq!(rig.slot.selected, None);
    }

    #[test]
    fn drag_scrolls_from_anchor() {
        let mut rig = Rig::new(scroll_panel(200.0, 50.0));
        rig.step(PointerInput::at(10.0, 300.0, true));
        assert_eq!(
            rig.slot.scroll_anchor,
            Some(ScrollAnchor {
                scroll_y: 50.0,
                ray_y: 300.0
            })
        );
        rig.step(PointerInput::at(10.0, 250.0, true));
        assert_eq!(rig.scroll_y("list"), Some(100.0));
    }

    #[test]
    fn drag_clamps_to_limits() {
        let mut rig = Rig::new(scroll_panel(200.0, 50.0));
        rig.step(PointerInput::at(10.0, 300.0, true));
        rig.step(PointerInput::at(10.0, -1000.0, true));
        assert_eq!(rig.scroll_y("list"), Some(200.0));
        rig.step(PointerInput::at(10.0, 1000.0, true));
        assert_eq!(rig.scroll_y("list"), Some(0.0));
    }

    #[test]
    fn release_clears_anchor() {
        let mut rig = Rig::new(scroll_panel(200.0, 0.0));
        rig.step(PointerInput::at(10.0, 300.0, true));
        rig.step(PointerInput::at(10.0, 300.0, false));
        assert!(!rig.slot.pressed);
        assert_eq!(rig.slot.scroll_anchor, None);

        // Moving without a press never scrolls.
        rig.step(PointerInput::at(10.0, 100.0, false));
        assert_eq!(rig.scroll_y("list"), Some(0.0));
    }

    #[test]
    fn non_scroll_elements_take_no_anchor() {
        let mut rig = Rig::new(button_panel());
        rig.step(PointerInput::at(50.0, 20.0, true));
        assert_eq!(rig.slot.scroll_anchor, None);
    }

    #[test]
    fn uv_input_maps_to_pixels() {
        let input = PointerInput::from_uv(
            Some(SurfaceUv::new(0.25, 0.75)),
            SurfaceSize::new(800.0, 600.0),
            true,
        );
        assert_eq!(input.point, Some(Point::new(200.0, 150.0)));
        assert!(PointerInput::from_uv(None, SurfaceSize::new(1.0, 1.0), false).point.is_none());
    }
}
