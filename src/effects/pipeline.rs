//! Ordered lifecycle event pipeline.
//!
//! A transition runs as a fixed list of steps. Each step notifies the
//! observers of one event in registration order; the commit step moves the
//! machine to its new state. The driver runs synchronously until an
//! observer defers, then continues inside a future once the deferred
//! settles.

use crate::core::{
    ON_AFTER_TRANSITION, ON_BEFORE_TRANSITION, ON_ENTER_STATE, ON_LEAVE_STATE, ON_TRANSITION,
};
use crate::effects::context::TransitionContext;
use crate::effects::error::{FsmError, ObserverError};
use crate::effects::machine::{Outcome, Transit};
use crate::effects::observer::{Deferred, Observer, Response};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;

enum Step<D, A> {
    Notify {
        event: String,
        observers: Vec<Arc<dyn Observer<D, A>>>,
    },
    Commit,
}

enum Progress {
    Finished(Result<Outcome, FsmError>),
    Suspended(Deferred),
}

pub(crate) struct EventPipeline<D, A> {
    context: TransitionContext<D, A>,
    args: A,
    steps: VecDeque<Step<D, A>>,
    current: VecDeque<Arc<dyn Observer<D, A>>>,
    previous_event: Option<String>,
    previous_result: Option<Value>,
    settled: bool,
}

impl<D, A> EventPipeline<D, A>
where
    D: Send + Sync + 'static,
    A: Send + Sync + 'static,
{
    /// Build the step list for a transition. Leave, commit and enter steps
    /// are only present when `changed` is set.
    pub(crate) fn new(context: TransitionContext<D, A>, args: A, changed: bool) -> Self {
        let steps = {
            let fsm = context.fsm();
            let graph = fsm.graph();
            let registry = fsm.observers();
            let transition = graph.transition_events(&context.transition);
            let from = graph.state_events(&context.from);
            let to = graph.state_events(&context.to);

            let notify = |event: &str| Step::Notify {
                event: event.to_string(),
                observers: registry.implementing(event),
            };

            let mut steps = VecDeque::with_capacity(12);
            steps.push_back(notify(ON_BEFORE_TRANSITION));
            steps.push_back(notify(&transition.before));
            if changed {
                steps.push_back(notify(ON_LEAVE_STATE));
                steps.push_back(notify(&from.leave));
            }
            steps.push_back(notify(ON_TRANSITION));
            if changed {
                steps.push_back(Step::Commit);
                steps.push_back(notify(ON_ENTER_STATE));
                steps.push_back(notify(&to.enter));
                steps.push_back(notify(&to.on));
            }
            steps.push_back(notify(ON_AFTER_TRANSITION));
            steps.push_back(notify(&transition.after));
            steps.push_back(notify(&transition.on));
            steps
        };

        Self {
            context,
            args,
            steps,
            current: VecDeque::new(),
            previous_event: None,
            previous_result: None,
            settled: false,
        }
    }

    /// Drive the pipeline until it settles or suspends.
    pub(crate) fn run(mut self) -> Transit {
        match self.drive() {
            Progress::Finished(result) => Transit::ready(result),
            Progress::Suspended(deferred) => Transit::suspended(self.resume(deferred)),
        }
    }

    async fn resume(mut self, mut deferred: Deferred) -> Result<Outcome, FsmError> {
        loop {
            match deferred.await {
                Ok(value) => self.previous_result = value,
                Err(error) => return self.fail(error),
            }
            match self.drive() {
                Progress::Finished(result) => return result,
                Progress::Suspended(next) => deferred = next,
            }
        }
    }

    fn drive(&mut self) -> Progress {
        loop {
            if let Some(observer) = self.current.pop_front() {
                let response = observer.notify(&self.context.event, &self.context, &self.args);
                match response {
                    Ok(Response::Continue) => self.previous_result = None,
                    Ok(Response::Value(value)) => self.previous_result = Some(value),
                    Ok(Response::Cancel) => {
                        tracing::debug!(
                            transition = %self.context.transition,
                            event = %self.context.event,
                            "transition cancelled by observer"
                        );
                        return Progress::Finished(self.finish(Outcome::Cancelled));
                    }
                    Ok(Response::Defer(deferred)) => {
                        tracing::debug!(
                            transition = %self.context.transition,
                            event = %self.context.event,
                            "transition suspended on deferred observer"
                        );
                        return Progress::Suspended(deferred);
                    }
                    Err(error) => return Progress::Finished(self.fail(error)),
                }
                continue;
            }

            match self.steps.pop_front() {
                None => {
                    let outcome = match self.previous_result.take() {
                        Some(value) => Outcome::Returned(value),
                        None => Outcome::Completed,
                    };
                    return Progress::Finished(self.finish(outcome));
                }
                Some(Step::Commit) => {
                    self.context.fsm().commit(&self.context);
                    for plugin in self.context.fsm().plugins() {
                        plugin.commit(&self.context, &self.args);
                    }
                    self.previous_event = None;
                    self.previous_result = None;
                }
                Some(Step::Notify { event, observers }) => {
                    self.context.event = event;
                    self.announce();
                    self.current = observers.into();
                }
            }
        }
    }

    /// Run the plugin lifecycle hook unless the previous step dispatched the
    /// same event name.
    fn announce(&mut self) {
        let event = &self.context.event;
        tracing::trace!(transition = %self.context.transition, %event, "dispatching event");
        if self.previous_event.as_ref() == Some(event) {
            return;
        }
        self.previous_event = Some(event.clone());
        for plugin in self.context.fsm().plugins() {
            plugin.lifecycle(&self.context, &self.args);
        }
    }

    fn finish(&mut self, outcome: Outcome) -> Result<Outcome, FsmError> {
        self.settled = true;
        self.context.fsm().end_transit();
        Ok(outcome)
    }

    fn fail(&mut self, error: ObserverError) -> Result<Outcome, FsmError> {
        tracing::debug!(
            transition = %self.context.transition,
            event = %self.context.event,
            %error,
            "observer failed"
        );
        self.settled = true;
        self.context.fsm().end_transit();
        Err(FsmError::Observer(error))
    }
}

/// A pipeline dropped before it settles was abandoned while suspended. The
/// machine keeps whatever state was already committed and stops pending.
impl<D, A> Drop for EventPipeline<D, A> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        tracing::debug!(
            transition = %self.context.transition,
            event = %self.context.event,
            "suspended transition abandoned"
        );
        self.context.fsm().end_transit();
    }
}
