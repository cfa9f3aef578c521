//! # Cola FIFO de tareas
//! src/pool/queue.rs
//!
//! Cola thread-safe compartida entre el acceptor (productor) y los workers
//! (consumidores). Un único `Mutex` protege las tareas y el flag de parada;
//! un `Condvar` despierta a los workers.
//!
//! ## Contrato
//!
//! - `push` agrega al final y despierta a UN worker.
//! - `close` marca la parada y despierta a TODOS.
//! - `pop` solo retorna `None` cuando la cola está cerrada Y vacía, así que
//!   las tareas pendientes se drenan antes de que un worker termine.

use super::task::Task;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};

/// Estado protegido por el mutex
struct QueueState {
    tasks: VecDeque<Task>,
    stopping: bool,
}

/// Cola FIFO thread-safe
pub struct TaskQueue {
    state: Mutex<QueueState>,
    condvar: Condvar,
}

impl TaskQueue {
    /// Crea una cola vacía y abierta
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                tasks: VecDeque::new(),
                stopping: false,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Un worker que hizo panic mientras tenía el lock no invalida la cola:
    /// el estado siempre queda consistente entre operaciones.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Encola una tarea al final
    ///
    /// Nunca bloquea más allá del lock y nunca rechaza.
    pub fn push(&self, task: Task) {
        self.lock().tasks.push_back(task);

        // Notificar a un worker esperando
        self.condvar.notify_one();
    }

    /// Desencola la tarea del frente
    ///
    /// Bloquea hasta que haya una tarea o la cola se cierre.
    /// Retorna `None` solo si la cola está cerrada y vacía.
    pub fn pop(&self) -> Option<Task> {
        let mut state = self.lock();

        loop {
            if let Some(task) = state.tasks.pop_front() {
                return Some(task);
            }
            if state.stopping {
                return None;
            }

            state = self
                .condvar
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Marca la parada y despierta a todos los workers
    ///
    /// Retorna `false` si la cola ya estaba cerrada.
    pub fn close(&self) -> bool {
        let was_open = {
            let mut state = self.lock();
            !std::mem::replace(&mut state.stopping, true)
        };

        self.condvar.notify_all();
        was_open
    }

    /// Retorna el tamaño actual de la cola
    pub fn len(&self) -> usize {
        self.lock().tasks.len()
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}
