//! # Pool fijo de Workers
//! src/pool/worker_pool.rs
//!
//! N threads drenando una `TaskQueue` compartida.
//!
//! ## Ciclo de vida
//!
//! ```text
//! start(n) ──► running ──shutdown()──► stopping ──► (todos los threads joined)
//! ```
//!
//! Un worker termina solo cuando la parada fue pedida Y la cola está vacía.
//! El fallo de una tarea (error o panic) se registra y el worker sigue.

use super::queue::TaskQueue;
use super::task::{Task, TaskResult};
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

/// Pool de threads con cola FIFO compartida
pub struct WorkerPool {
    queue: Arc<TaskQueue>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Lanza `size` workers antes de retornar
    ///
    /// # Errores
    ///
    /// `InvalidInput` si `size == 0`, o el error del sistema si no se pudo
    /// crear algún thread (los ya creados se detienen antes de retornar).
    pub fn start(size: usize) -> io::Result<Self> {
        if size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "worker pool needs at least one thread",
            ));
        }

        let mut pool = Self {
            queue: Arc::new(TaskQueue::new()),
            workers: Vec::with_capacity(size),
        };

        for i in 0..size {
            let queue = Arc::clone(&pool.queue);
            let name = format!("worker-{}", i);

            // Si falla, `pool` se dropea y detiene a los workers ya lanzados
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || Self::worker_loop(name, queue))?;

            pool.workers.push(handle);
        }

        Ok(pool)
    }

    /// Encola una tarea y despierta a un worker
    pub fn enqueue(&self, task: Task) {
        self.queue.push(task);
    }

    /// Atajo para encolar un closure
    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce() -> TaskResult + Send + 'static,
    {
        self.enqueue(Task::new(job));
    }

    /// Número de workers
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Tareas esperando en la cola
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Detiene el pool
    ///
    /// Marca la parada, despierta a todos los workers y bloquea hasta que
    /// terminen. Las tareas ya encoladas se ejecutan antes. Consume el pool,
    /// así que no se puede encolar nada después.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.queue.close();

        for handle in self.workers.drain(..) {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() {
                error!(worker = %name, "Worker thread terminated abnormally");
            }
        }
    }

    /// Loop principal del worker
    fn worker_loop(name: String, queue: Arc<TaskQueue>) {
        debug!(worker = %name, "Worker started");

        while let Some(task) = queue.pop() {
            match panic::catch_unwind(AssertUnwindSafe(|| task.run())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!(worker = %name, error = %e, "Task failed");
                }
                Err(payload) => {
                    error!(worker = %name, panic = %panic_message(&*payload), "Task panicked");
                }
            }
        }

        debug!(worker = %name, "Worker stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

/// Extrae el mensaje de un panic (`&str` o `String`)
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Barrier, Mutex};
    use std::time::Duration;

    #[test]
    fn test_pending_counts_queued_tasks() {
        let pool = WorkerPool::start(1).unwrap();
        let (started_tx, started_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();

        pool.execute(move || {
            started_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            Ok(())
        });
        started_rx.recv().unwrap();

        // El único worker está ocupado: todo lo demás queda en la cola
        pool.execute(|| Ok(()));
        pool.execute(|| Ok(()));
        assert_eq!(pool.pending(), 2);

        release_tx.send(()).unwrap();
        pool.shutdown();
    }

    #[test]
    fn test_start_zero_is_rejected() {
        let err = WorkerPool::start(0).err().expect("size 0 must fail");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_start_launches_all_workers() {
        let pool = WorkerPool::start(3).unwrap();
        assert_eq!(pool.size(), 3);
        pool.shutdown();
    }

    #[test]
    fn test_all_tasks_run_exactly_once_before_shutdown_returns() {
        let pool = WorkerPool::start(4).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for id in 0..200usize {
            let seen = Arc::clone(&seen);
            pool.execute(move || {
                thread::sleep(Duration::from_micros(50));
                seen.lock().unwrap().push(id);
                Ok(())
            });
        }

        pool.shutdown();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 200);
        let unique: HashSet<_> = seen.iter().copied().collect();
        assert_eq!(unique.len(), 200);
    }

    #[test]
    fn test_shutdown_drains_queue_with_single_worker() {
        let pool = WorkerPool::start(1).unwrap();
        let gate = Arc::new(Barrier::new(2));
        let order = Arc::new(Mutex::new(Vec::new()));

        // La primera tarea bloquea al único worker hasta que todo esté encolado
        {
            let gate = Arc::clone(&gate);
            pool.execute(move || {
                gate.wait();
                Ok(())
            });
        }
        for label in ["A", "B", "C"] {
            let order = Arc::clone(&order);
            pool.execute(move || {
                order.lock().unwrap().push(label);
                Ok(())
            });
        }

        gate.wait();
        pool.shutdown();

        // Con un solo worker el orden FIFO es observable
        assert_eq!(*order.lock().unwrap(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_failing_task_does_not_stop_worker() {
        let pool = WorkerPool::start(1).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        pool.execute(|| Err("connection reset".into()));
        {
            let counter = Arc::clone(&counter);
            pool.execute(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        pool.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_task_does_not_stop_worker() {
        let pool = WorkerPool::start(1).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        pool.execute(|| panic!("handler bug"));
        {
            let counter = Arc::clone(&counter);
            pool.execute(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        pool.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_idle_pool_shutdown_returns() {
        let pool = WorkerPool::start(8).unwrap();
        thread::sleep(Duration::from_millis(20));
        pool.shutdown();
    }

    #[test]
    fn test_drop_joins_workers() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = WorkerPool::start(2).unwrap();
            for _ in 0..10 {
                let counter = Arc::clone(&counter);
                pool.execute(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                });
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*payload), "boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(&*payload), "bang");
    }
}
