//! Delete confirmation flow
//!
//! Deleting a grouped event walks a short confirmation dialog: first the
//! whole group, then just the selected day, then nothing. Standalone events
//! get a single confirmation. The flow only resolves a decision; executing
//! it is the store's job.

use chrono::NaiveDate;

use crate::models::event::CalendarEvent;
use crate::services::events::GroupMembership;
use crate::utils::errors::{Result, StudyCalError};

/// Question the caller should put to the user next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletePrompt {
    /// Delete this standalone event?
    ConfirmDelete,
    /// This event spans `days` days; delete every one of them?
    ConfirmWholeGroup {
        days: usize,
        first: NaiveDate,
        last: NaiveDate,
    },
    /// Delete just this day's row?
    ConfirmSingleDay { date: NaiveDate },
}

/// What the user settled on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteDecision {
    /// Remove every row of the group
    RemoveGroup { group_id: String },
    /// Remove the selected row only
    RemoveRow { id: String },
    /// Leave everything untouched
    Keep,
}

/// Where the flow stands after an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStep {
    Ask(DeletePrompt),
    Resolved(DeleteDecision),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GroupSummary {
    group_id: String,
    days: usize,
    first: NaiveDate,
    last: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FlowState {
    AwaitingWholeGroup(GroupSummary),
    AwaitingSingleDay,
    AwaitingSingle,
    Resolved(DeleteDecision),
}

/// Confirmation dialog for deleting one event
#[derive(Debug, Clone)]
pub struct DeleteFlow {
    state: FlowState,
    event_id: String,
    event_date: NaiveDate,
}

impl DeleteFlow {
    /// Start the dialog for an event with its resolved membership
    pub fn new(event: &CalendarEvent, membership: &GroupMembership) -> Self {
        let group = match (
            event.group_ref(),
            membership.members.first(),
            membership.members.last(),
        ) {
            (Some(group_id), Some(first), Some(last)) if membership.is_grouped => {
                Some(GroupSummary {
                    group_id: group_id.to_string(),
                    days: membership.members.len(),
                    first: first.date,
                    last: last.date,
                })
            }
            _ => None,
        };

        let state = match group {
            Some(group) => FlowState::AwaitingWholeGroup(group),
            None => FlowState::AwaitingSingle,
        };

        Self {
            state,
            event_id: event.id.clone(),
            event_date: event.date,
        }
    }

    /// The question currently awaiting an answer, or the settled decision
    pub fn current(&self) -> FlowStep {
        match &self.state {
            FlowState::AwaitingWholeGroup(group) => {
                FlowStep::Ask(DeletePrompt::ConfirmWholeGroup {
                    days: group.days,
                    first: group.first,
                    last: group.last,
                })
            }
            FlowState::AwaitingSingleDay => FlowStep::Ask(DeletePrompt::ConfirmSingleDay {
                date: self.event_date,
            }),
            FlowState::AwaitingSingle => FlowStep::Ask(DeletePrompt::ConfirmDelete),
            FlowState::Resolved(decision) => FlowStep::Resolved(decision.clone()),
        }
    }

    /// Feed one yes/no answer into the dialog
    pub fn answer(&mut self, confirmed: bool) -> Result<FlowStep> {
        let next = match (&self.state, confirmed) {
            (FlowState::AwaitingWholeGroup(group), true) => {
                FlowState::Resolved(DeleteDecision::RemoveGroup {
                    group_id: group.group_id.clone(),
                })
            }
            (FlowState::AwaitingWholeGroup(_), false) => FlowState::AwaitingSingleDay,
            (FlowState::AwaitingSingleDay, true) | (FlowState::AwaitingSingle, true) => {
                FlowState::Resolved(DeleteDecision::RemoveRow {
                    id: self.event_id.clone(),
                })
            }
            (FlowState::AwaitingSingleDay, false) | (FlowState::AwaitingSingle, false) => {
                FlowState::Resolved(DeleteDecision::Keep)
            }
            (FlowState::Resolved(_), _) => {
                return Err(StudyCalError::InvalidStateTransition {
                    from: "resolved".to_string(),
                    to: "answer".to_string(),
                })
            }
        };

        self.state = next;
        Ok(self.current())
    }

    /// The settled decision, once the dialog is over
    pub fn decision(&self) -> Option<&DeleteDecision> {
        match &self.state {
            FlowState::Resolved(decision) => Some(decision),
            _ => None,
        }
    }

    /// Run the dialog to completion against a fixed list of answers
    pub fn resolve(
        event: &CalendarEvent,
        membership: &GroupMembership,
        answers: &[bool],
    ) -> Result<DeleteDecision> {
        let mut flow = Self::new(event, membership);
        for &confirmed in answers {
            if let FlowStep::Resolved(decision) = flow.answer(confirmed)? {
                return Ok(decision);
            }
        }
        Err(StudyCalError::InvalidInput(
            "confirmation dialog left unanswered".to_string(),
        ))
    }
}
