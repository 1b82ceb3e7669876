//! 绑定视图生命周期的异步任务
//!
//! 视图销毁时任务被中止，迟到的响应不会再写入已销毁视图的信号。

use std::future::Future;
use std::sync::{Arc, Weak};

use futures::future::{AbortHandle, Abortable, Aborted};
use leptos::prelude::{GetValue, Owner, StoredValue, on_cleanup};
use leptos::task::spawn_local;

/// 包装为可中止的 future，返回其中止句柄
pub fn bind<F>(fut: F) -> (AbortHandle, impl Future<Output = Result<F::Output, Aborted>>)
where
    F: Future,
{
    let (handle, registration) = AbortHandle::new_pair();
    (handle, Abortable::new(fut, registration))
}

/// 同 `bind`，但中止句柄由任务自身持有，任务结束即释放
///
/// 外部只拿到弱引用，长时间存活的视图不会累积已结束任务的句柄。
pub fn bind_released<F>(fut: F) -> (Weak<AbortHandle>, impl Future<Output = Result<F::Output, Aborted>>)
where
    F: Future,
{
    let (handle, task) = bind(fut);
    let handle = Arc::new(handle);
    let weak = Arc::downgrade(&handle);
    let task = async move {
        let out = task.await;
        drop(handle);
        out
    };
    (weak, task)
}

/// 在当前 Owner 下启动任务；Owner 清理时中止
pub fn spawn_bound<F>(fut: F)
where
    F: Future<Output = ()> + 'static,
{
    let (handle, task) = bind_released(fut);
    on_cleanup(move || {
        if let Some(handle) = handle.upgrade() {
            handle.abort();
        }
    });
    spawn_local(async move {
        if task.await.is_err() {
            log::debug!("[Task] aborted with its view");
        }
    });
}

/// 组件创建时捕获的 Owner
///
/// 事件回调执行时不一定有当前 Owner，从回调启动的任务需要显式挂到组件上。
#[derive(Clone, Copy)]
pub struct TaskScope(StoredValue<Option<Owner>>);

impl TaskScope {
    pub fn current() -> Self {
        Self(StoredValue::new(Owner::current()))
    }

    pub fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + 'static,
    {
        match self.0.get_value() {
            Some(owner) => owner.with(|| spawn_bound(fut)),
            None => spawn_bound(fut),
        }
    }
}
