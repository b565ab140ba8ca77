//! 可观察状态容器
//!
//! 会话与各页面控制器都把状态放在这里：所有修改经过 [`Observable::update`]，
//! 修改后把快照推送给订阅者（视图层借此把状态同步进 Leptos 信号）。
//! 容器被 [`Observable::dispose`] 后，迟到的修改会被丢弃。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Listener<T> = Box<dyn Fn(&T)>;

struct Inner<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<Listener<T>>>,
    disposed: Cell<bool>,
}

pub struct Observable<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                listeners: RefCell::new(Vec::new()),
                disposed: Cell::new(false),
            }),
        }
    }

    /// 当前状态的快照
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// 修改状态并通知订阅者。已释放时什么也不做。
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        if self.inner.disposed.get() {
            log::debug!("[Observable] update after dispose discarded");
            return;
        }
        f(&mut self.inner.value.borrow_mut());

        let snapshot = self.get();
        for listener in self.inner.listeners.borrow().iter() {
            listener(&snapshot);
        }
    }

    pub fn set(&self, value: T) {
        self.update(|v| *v = value);
    }

    /// 订阅后立即收到一次当前快照
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) {
        listener(&self.get());
        self.inner.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn dispose(&self) {
        self.inner.disposed.set(true);
        self.inner.listeners.borrow_mut().clear();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}
