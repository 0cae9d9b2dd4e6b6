//! Placement Applier: commits a validated placement.
//!
//! Writes one placement record per affected class per period of the
//! linked span and marks every entry's teacher busy for those cells.
//! Callers must have validated the placement with `can_place` first;
//! no legality checks happen here.

use crate::models::{Block, Cell, ClassKey, LinkedPos, Placement, TeacherLoad, Timetable};

/// Commits `block` into `[start_period, start_period + linked_periods)`
/// on `day`.
pub fn apply_placement(
    block: &Block,
    day: u8,
    start_period: u8,
    timetable: &mut Timetable,
    load: &mut TeacherLoad,
) {
    let linked = block.linked_periods.max(1);
    let affected = block.affected_classes();

    for offset in 0..linked {
        let cell = Cell::new(day, start_period + offset);
        let linked_pos = LinkedPos::for_span(offset, linked);

        for class in &affected {
            let entry = block.entry_for_class(class).or_else(|| block.entries.first());
            let Some(entry) = entry else { continue };
            timetable.set(
                ClassKey::new(block.grade.clone(), class.clone()),
                cell,
                Placement {
                    block_id: Some(block.id.clone()),
                    subject: entry.subject.clone(),
                    teacher_name: entry.teacher_name.clone(),
                    teacher_id: entry.teacher_id.clone(),
                    is_elective: block.is_elective,
                    is_fixed: false,
                    linked_pos,
                },
            );
        }

        for entry in &block.entries {
            load.occupy(entry.teacher_key(), cell);
        }
    }
}
