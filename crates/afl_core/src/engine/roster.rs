//! Unit Roster: the single authority for which units exist.
//!
//! Units live in an arena of generation-tagged slots. A `UnitId` held by the
//! ball or by a pending effect stays cheap to check: it is live only while
//! its slot still carries the same generation.

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::constants::roster::PLACEMENT_RADIUS;
use super::constants::stamina;
use super::field::{Field, FieldPos, GridCell};
use crate::error::{Result, SimError};
use crate::models::{TeamId, Unit, UnitSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId {
    index: u32,
    generation: u32,
}

impl UnitId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }

    #[cfg(test)]
    pub(crate) fn from_raw(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    unit: Option<Unit>,
}

#[derive(Debug, Clone)]
pub struct Roster {
    slots: Vec<Slot>,
    /// Live ids in registration order; this is the turn order.
    order: Vec<UnitId>,
    occupancy: FxHashMap<GridCell, UnitId>,
    /// Multiplier on stamina costs, raised by fatigue events.
    stamina_drain: f32,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            order: Vec::new(),
            occupancy: FxHashMap::default(),
            stamina_drain: 1.0,
        }
    }

    /// Place a unit on the nearest free cell to the one it asked for.
    pub fn register(&mut self, spec: UnitSpec, field: &Field) -> Result<UnitId> {
        let Some(cell) = self.find_free_cell(spec.cell, field) else {
            return Err(SimError::PlacementFailed { name: spec.name, x: spec.cell.x, y: spec.cell.y });
        };

        let index = match self.slots.iter().position(|slot| slot.unit.is_none()) {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[index];
        slot.unit = Some(Unit::from_spec(spec, cell));
        let id = UnitId { index: index as u32, generation: slot.generation };

        self.occupancy.insert(cell, id);
        self.order.push(id);
        Ok(id)
    }

    /// Ring search outward from `near`; within a ring, closer cells first,
    /// then row-major order. A cell some live unit calls home is never free,
    /// even while that unit stands elsewhere.
    pub fn find_free_cell(&self, near: GridCell, field: &Field) -> Option<GridCell> {
        let mut candidates = Vec::new();
        for dy in -PLACEMENT_RADIUS..=PLACEMENT_RADIUS {
            for dx in -PLACEMENT_RADIUS..=PLACEMENT_RADIUS {
                candidates.push((dx.abs() + dy.abs(), dy, dx));
            }
        }
        candidates.sort_unstable();
        candidates
            .into_iter()
            .map(|(_, dy, dx)| GridCell::new(near.x + dx, near.y + dy))
            .find(|&cell| field.contains_cell(cell) && !self.is_occupied(cell) && !self.is_home_cell(cell))
    }

    fn is_home_cell(&self, cell: GridCell) -> bool {
        self.slots.iter().filter_map(|slot| slot.unit.as_ref()).any(|unit| unit.home_cell == cell)
    }

    /// Deregister every unit. Outstanding ids become stale.
    pub fn clear(&mut self) -> usize {
        let removed = self.order.len();
        for slot in &mut self.slots {
            if slot.unit.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.order.clear();
        self.occupancy.clear();
        self.stamina_drain = 1.0;
        removed
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.unit.as_ref())
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.unit.as_mut())
    }

    pub fn is_live(&self, id: UnitId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> &[UnitId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &Unit)> + '_ {
        self.order.iter().filter_map(move |&id| self.get(id).map(|unit| (id, unit)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_occupied(&self, cell: GridCell) -> bool {
        self.occupancy.contains_key(&cell)
    }

    /// Move a unit onto a free in-bounds cell. Returns false when the move is refused.
    pub fn move_unit(&mut self, id: UnitId, to: GridCell, field: &Field) -> bool {
        if !field.contains_cell(to) || self.is_occupied(to) {
            return false;
        }
        let Some(unit) = self.get_mut(id) else {
            return false;
        };
        let from = unit.cell;
        unit.cell = to;
        self.occupancy.remove(&from);
        self.occupancy.insert(to, id);
        true
    }

    /// Apply a stamina delta from the cost table. Costs are scaled by the
    /// current drain multiplier; recovery is not.
    pub fn apply_stamina(&mut self, id: UnitId, delta: f32) {
        let drain = self.stamina_drain;
        let Some(unit) = self.get_mut(id) else {
            return;
        };
        let delta = if delta < 0.0 { delta * drain } else { delta };
        unit.stamina = (unit.stamina + delta).clamp(0.0, stamina::MAX);

        let exhausted = unit.stamina <= 0.0;
        if exhausted && !unit.exhausted {
            log::debug!("{} is exhausted", unit.name);
        }
        unit.exhausted = exhausted;
    }

    pub fn stamina_drain(&self) -> f32 {
        self.stamina_drain
    }

    pub fn set_stamina_drain(&mut self, drain: f32) {
        self.stamina_drain = drain.max(0.0);
    }

    pub fn set_consciousness(&mut self, id: UnitId, value: f32) -> bool {
        match self.get_mut(id) {
            Some(unit) => {
                unit.consciousness = value.clamp(0.0, 100.0);
                true
            }
            None => false,
        }
    }

    pub fn adjust_consciousness(&mut self, id: UnitId, delta: f32) {
        if let Some(unit) = self.get_mut(id) {
            unit.consciousness = (unit.consciousness + delta).clamp(0.0, 100.0);
        }
    }

    pub fn set_form_bonus(&mut self, id: UnitId, bonus: f32) -> bool {
        match self.get_mut(id) {
            Some(unit) => {
                unit.form_bonus = bonus;
                true
            }
            None => false,
        }
    }

    /// Put every unit back on the cell it was registered on.
    pub fn return_home(&mut self) {
        self.occupancy.clear();
        for &id in &self.order {
            let index = id.index as usize;
            if let Some(unit) = self.slots[index].unit.as_mut() {
                unit.cell = unit.home_cell;
                self.occupancy.insert(unit.cell, id);
            }
        }
    }

    /// Fresh legs and clear heads for a new match.
    pub fn restore_condition(&mut self) {
        for slot in &mut self.slots {
            if let Some(unit) = slot.unit.as_mut() {
                unit.stamina = stamina::MAX;
                unit.consciousness = 100.0;
                unit.form_bonus = 0.0;
                unit.exhausted = false;
            }
        }
        self.stamina_drain = 1.0;
    }

    /// Nearest live unit of `team` to `pos`; ties go to the earlier registration.
    pub fn nearest_of_team(&self, team: TeamId, pos: FieldPos) -> Option<UnitId> {
        self.iter()
            .filter(|(_, unit)| unit.team == team)
            .fold(None, |best: Option<(UnitId, f32)>, (id, unit)| {
                let dist = unit.cell.distance_to(pos);
                match best {
                    Some((_, best_dist)) if best_dist <= dist => best,
                    _ => Some((id, dist)),
                }
            })
            .map(|(id, _)| id)
    }

    pub fn count_below_stamina(&self, threshold: f32) -> usize {
        self.iter().filter(|(_, unit)| unit.stamina < threshold).count()
    }
}
