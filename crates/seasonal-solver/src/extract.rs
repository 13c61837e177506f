// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Converts a search solution back into allocation records of the model.

use seasonal_bnb::{problem::ConstraintModel, solution::BnbSolution};
use seasonal_model::{index::BasketIndex, model::AllocationModel, solution::AllocatedEvent};

/// Turns the selected variables of `solution` into allocation records.
///
/// `basket` is the basket of the tier that produced the solution. The
/// records are sorted by space id, weekday, start and event id.
pub fn extract_allocations(
    model: &AllocationModel,
    problem: &ConstraintModel,
    solution: &BnbSolution,
    basket: Option<BasketIndex>,
) -> Vec<AllocatedEvent> {
    let mut allocated: Vec<AllocatedEvent> = solution
        .assignments()
        .iter()
        .map(|assignment| {
            let var = problem.var(assignment.var);
            AllocatedEvent::new(model, var.space(), var.occurrence(), assignment.start, basket)
        })
        .collect();
    sort_allocations(&mut allocated);
    allocated
}

/// Sorts allocation records into their reporting order.
pub fn sort_allocations(allocated: &mut [AllocatedEvent]) {
    allocated.sort_by_key(|a| {
        (
            a.space_id(),
            a.weekday().num_days_from_monday(),
            a.start(),
            a.event_id(),
            a.occurrence_id(),
        )
    });
}
