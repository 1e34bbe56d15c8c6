use log::info;
pub type TaskID = i32;

pub trait SteppableTask: Send + 'static {
    /// Runs one unit of work. Returning `false` ends the task.
    ///
    /// Long steps should poll `stop` and return early once it is raised.
    fn step(&mut self, stop: &StopSignal) -> bool;
}

/// Worker-side view of a task's stop channel. Once raised it stays raised.
pub struct StopSignal {
    receiver: crossbeam_channel::Receiver<()>,
    raised: std::cell::Cell<bool>,
}

impl StopSignal {
    fn new(receiver: crossbeam_channel::Receiver<()>) -> Self {
        StopSignal {
            receiver,
            raised: std::cell::Cell::new(false),
        }
    }

    #[must_use]
    pub fn is_raised(&self) -> bool {
        if !self.raised.get() {
            match self.receiver.try_recv() {
                Ok(()) | Err(crossbeam_channel::TryRecvError::Disconnected) => {
                    self.raised.set(true);
                }
                Err(crossbeam_channel::TryRecvError::Empty) => {}
            }
        }
        self.raised.get()
    }

    /// Blocks for `timeout` unless a stop signal arrives first. Returns `true` when stopped.
    pub fn wait(&self, timeout: std::time::Duration) -> bool {
        if self.raised.get() {
            return true;
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(()) | Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                self.raised.set(true);
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
        }
        self.raised.get()
    }
}

pub struct ThreadManager {
    current_task_id: TaskID,
    tasks: std::collections::HashMap<TaskID, ManagedTask>,
}

impl ThreadManager {
    #[must_use]
    pub fn new() -> Self {
        ThreadManager {
            current_task_id: 0,
            tasks: std::collections::HashMap::new(),
        }
    }

    #[must_use]
    pub fn current_task_id(&self) -> TaskID {
        self.current_task_id
    }

    /// Spawns `task` on its own named thread. Each step is followed by `delay`
    /// until the task returns `false` or is told to stop.
    ///
    /// # Errors
    ///
    /// Returns the spawn error if the OS refuses to create the thread.
    pub fn add_task<T>(
        &mut self,
        name: &str,
        task: T,
        delay: std::time::Duration,
    ) -> Result<TaskID, std::io::Error>
    where
        T: SteppableTask,
    {
        let id = self.current_task_id;

        let (stop_sender, stop_receiver) = crossbeam_channel::bounded::<()>(1);

        let handle = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || run_task_with_delay(task, delay, &StopSignal::new(stop_receiver)))?;
        info!("ThreadManager: Started task {id} on thread '{name}'");
        self.tasks.insert(
            id,
            ManagedTask {
                handle,
                stop_sender,
            },
        );
        self.current_task_id += 1;
        Ok(id)
    }

    pub fn stop_task(&self, task_id: TaskID) {
        if let Some(task) = self.tasks.get(&task_id) {
            let _ = task.stop_sender.try_send(());
        }
    }

    pub fn stop_all_tasks(&self) {
        info!("ThreadManager: Signaling all tasks to stop...");
        for task in self.tasks.values() {
            let _ = task.stop_sender.try_send(());
        }
    }

    pub fn wait_on_task_finish(&mut self, task_id: TaskID) {
        if let Some(task) = self.tasks.remove(&task_id) {
            if task.handle.join().is_err() {
                log::error!("ThreadManager: Task {task_id} panicked");
            }
        }
    }

    /// `true` once the task's thread has exited (or the task is unknown).
    #[must_use]
    pub fn is_task_finished(&self, task_id: TaskID) -> bool {
        self.tasks
            .get(&task_id)
            .map_or(true, |task| task.handle.is_finished())
    }
}

impl Default for ThreadManager {
    fn default() -> Self {
        ThreadManager::new()
    }
}

impl Drop for ThreadManager {
    fn drop(&mut self) {
        self.stop_all_tasks();
        let ids: Vec<TaskID> = self.tasks.keys().copied().collect();
        for id in ids {
            self.wait_on_task_finish(id);
        }
    }
}

fn run_task_with_delay<T: SteppableTask>(
    mut task: T,
    delay: std::time::Duration,
    stop: &StopSignal,
) {
    loop {
        if stop.is_raised() {
            break;
        }

        if !task.step(stop) {
            break;
        }

        if stop.wait(delay) {
            break;
        }
    }
}

struct ManagedTask {
    handle: std::thread::JoinHandle<()>,
    stop_sender: crossbeam_channel::Sender<()>,
}
