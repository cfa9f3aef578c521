//! # Tareas
//! src/pool/task.rs
//!
//! Una tarea es trabajo diferido que se ejecuta exactamente una vez en
//! algún worker. En el servidor cada tarea representa "atender esta conexión".

/// Error que una tarea reporta al pool
pub type TaskError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Resultado de ejecutar una tarea
pub type TaskResult = Result<(), TaskError>;

/// Unidad de trabajo opaca
///
/// Es inmutable una vez encolada: solo se puede consumir con `run`.
pub struct Task {
    job: Box<dyn FnOnce() -> TaskResult + Send + 'static>,
}

impl Task {
    /// Envuelve un closure como tarea
    pub fn new<F>(job: F) -> Self
    where
        F: FnOnce() -> TaskResult + Send + 'static,
    {
        Self { job: Box::new(job) }
    }

    /// Ejecuta la tarea, consumiéndola
    pub fn run(self) -> TaskResult {
        (self.job)()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}
