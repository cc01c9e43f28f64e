use core::hash::Hash;
use std::collections::hash_map::{Entry, HashMap};




/// Returned by [`Exchange::status`] to indicate whether a task has received
/// all of its incoming messages and may be evaluated.
pub enum Status {
    Eligible,
    Ineligible,
}

impl Status {
    pub fn eligible_if(condition: bool) -> Self {
        if condition {
            Self::Eligible
        } else {
            Self::Ineligible
        }
    }
}




/// A member of a group of tasks which must exchange messages with their peers
/// before they can compute. In this crate the tasks are subdomains of the
/// grid, the messages are guard zone strips, and the computed value is the
/// local residual. Tasks own their data; message buffers are moved to the
/// recipient, never shared.
///
pub trait Exchange {
    /// Uniquely identifies a task within its group. Executors require this
    /// type to be `Hash + Eq`.
    type Key;

    /// The data sent from one task to another.
    type Message;

    /// The data product of a task. It is computed on a worker thread by the
    /// parallel executor.
    type Value;

    /// Return the key of this task.
    fn key(&self) -> Self::Key;

    /// Return the messages to be delivered to peers. A task may address a
    /// message to itself.
    fn messages(&self) -> Vec<(Self::Key, Self::Message)>;

    /// Take ownership of a message sent by a peer.
    fn receive(&mut self, message: Self::Message);

    /// Report whether every expected message has arrived.
    fn status(&self) -> Status;

    /// Run the task. CPU-intensive work is done here only.
    fn value(self) -> Self::Value;
}




/// Execute a group of tasks in serial, on the calling thread.
///
pub fn execute<I, A, K, V>(group: I) -> impl Iterator<Item = V>
where
    I: IntoIterator<Item = A>,
    A: Exchange<Key = K, Value = V>,
    K: Hash + Eq,
{
    let (eligible_sink, eligible_source) = crossbeam_channel::unbounded();

    coordinate(group, eligible_sink);

    eligible_source.into_iter().map(|task: A| task.value())
}




/// Execute a group of tasks in parallel. The coordinator delivers messages
/// on the calling thread, and hands each task to a dispatcher running in the
/// given Rayon scope as soon as the task is eligible. The dispatcher
/// evaluates tasks on the Rayon pool and sends their values to the returned
/// iterator.
///
/// _Note_: the coordinator and the dispatcher run concurrently, so the Rayon
/// pool needs at least two threads.
///
pub fn execute_par<'a, I, A, K, V>(scope: &rayon::Scope<'a>, group: I) -> impl Iterator<Item = V>
where
    I: IntoIterator<Item = A>,
    A: Send + Exchange<Key = K, Value = V> + 'a,
    K: Hash + Eq,
    V: Send + 'a,
{
    use rayon::prelude::*;

    assert!{
        rayon::current_num_threads() >= 2,
        "exchange::execute_par requires at least two threads to be running"
    };

    let (eligible_sink, eligible_source) = crossbeam_channel::unbounded();
    let (computed_sink, computed_source) = crossbeam_channel::unbounded();

    scope.spawn(move |_| {
        eligible_source
            .into_iter()
            .par_bridge()
            .for_each(|task: A| {
                // the receiver lives as long as the returned iterator
                computed_sink.send(task.value()).ok();
            })
    });

    coordinate(group, eligible_sink);
    computed_source.into_iter()
}




fn coordinate<I, A, K, V>(group: I, eligible: crossbeam_channel::Sender<A>)
where
    I: IntoIterator<Item = A>,
    A: Exchange<Key = K, Value = V>,
    K: Hash + Eq,
{
    let mut waiting: HashMap<K, A> = HashMap::new();
    let mut undelivered: Vec<(K, A::Message)> = Vec::new();

    for mut task in group {
        // Deliver each outgoing message to a peer already waiting, or hold
        // it until the peer shows up. A peer which becomes eligible is sent
        // off for evaluation.
        for (dest, message) in task.messages() {
            match waiting.entry(dest) {
                Entry::Occupied(mut entry) => {
                    entry.get_mut().receive(message);
                    if let Status::Eligible = entry.get().status() {
                        eligible.send(entry.remove()).unwrap()
                    }
                }
                Entry::Vacant(none) => undelivered.push((none.into_key(), message)),
            }
        }

        // Deliver the held messages addressed to this task, including the
        // ones it just sent to itself.
        let key = task.key();
        let (mine, others): (Vec<_>, Vec<_>) = undelivered.into_iter().partition(|(dest, _)| *dest == key);
        undelivered = others;

        for (_, message) in mine {
            task.receive(message)
        }

        match task.status() {
            Status::Eligible => eligible.send(task).unwrap(),
            Status::Ineligible => { waiting.insert(key, task); }
        }
    }

    assert!(
        waiting.is_empty() && undelivered.is_empty(),
        "{} tasks never received all of their messages", waiting.len());
}
