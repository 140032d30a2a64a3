use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::future::try_join;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use super::view_model::{DashboardViewModel, Notification};
use crate::client::AnalyticsClient;
use crate::gate::Area;

/// 薪资分布只保留服务端返回顺序中的前 10 条
pub const SALARY_TOP_N: usize = 10;

/// 总览加载失败时的用户提示
pub const OVERVIEW_FAILED_MESSAGE: &str = "Failed to load analytics";

/// 一次挂载独占的视图模型容器
///
/// 卸载后所有写入都会被丢弃。`attached` 只在 watch 通道的写锁内读写，
/// 所以卸载和结果写入之间不存在竞争。
#[derive(Clone)]
struct ViewCell {
    tx: Arc<watch::Sender<DashboardViewModel>>,
    attached: Arc<AtomicBool>,
}

impl ViewCell {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(DashboardViewModel::new());
        Self {
            tx: Arc::new(tx),
            attached: Arc::new(AtomicBool::new(true)),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut DashboardViewModel)) -> bool {
        self.tx.send_if_modified(|view| {
            if !self.attached.load(Ordering::Acquire) {
                return false;
            }
            apply(view);
            true
        })
    }

    fn detach(&self) {
        self.tx.send_if_modified(|_| {
            self.attached.store(false, Ordering::Release);
            false
        });
    }

    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }
}

/// 仪表盘数据编排
///
/// 总览和薪资分布各自独立，捐赠预测和导师匹配作为一个联合操作，
/// 四个请求同时发起，互不等待。
#[derive(Clone)]
pub struct DashboardOrchestrator {
    client: Arc<dyn AnalyticsClient>,
    prediction_limit: u32,
}

impl DashboardOrchestrator {
    pub fn new(client: Arc<dyn AnalyticsClient>, prediction_limit: u32) -> Self {
        Self {
            client,
            prediction_limit,
        }
    }

    /// 挂载仪表盘并在后台开始加载
    pub fn mount(self, area: Area) -> DashboardMount {
        let view = ViewCell::new();
        let task_view = view.clone();
        let span = tracing::info_span!("dashboard", area = area.path());
        let task = tokio::spawn(async move { self.run(&task_view).await }.instrument(span));

        DashboardMount {
            id: Uuid::new_v4(),
            area,
            view,
            task,
            finished: false,
        }
    }

    async fn run(&self, view: &ViewCell) {
        let overview = async {
            let result = self.client.overview().await;
            view.update(|v| {
                match result {
                    Ok(overview) => v.overview = Some(overview),
                    Err(e) => {
                        tracing::error!("Failed to load analytics overview: {}", e);
                        v.notifications.push(Notification::error(OVERVIEW_FAILED_MESSAGE));
                    }
                }
                v.loading = false;
            });
        };

        let salary = async {
            match self.client.salary_distribution().await {
                Ok(rows) => {
                    view.update(|v| {
                        v.salary_by_major = rows.into_iter().take(SALARY_TOP_N).collect();
                    });
                }
                Err(e) => tracing::error!("Failed to load salary data: {}", e),
            }
        };

        let predictions = async {
            let joint = try_join(
                self.client.top_donors(self.prediction_limit),
                self.client.mentor_matches(self.prediction_limit),
            );
            match joint.await {
                Ok((donors, mentors)) => {
                    view.update(|v| {
                        v.top_donors = donors;
                        v.mentor_matches = mentors;
                    });
                }
                Err(e) => tracing::error!("Failed to load predictions: {}", e),
            }
        };

        tokio::join!(overview, salary, predictions);
        tracing::debug!("Dashboard data sources settled");
    }
}

/// 已挂载仪表盘的句柄，丢弃即卸载
pub struct DashboardMount {
    id: Uuid,
    area: Area,
    view: ViewCell,
    task: JoinHandle<()>,
    finished: bool,
}

impl DashboardMount {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn area(&self) -> Area {
        self.area
    }

    pub fn snapshot(&self) -> DashboardViewModel {
        self.view.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardViewModel> {
        self.view.tx.subscribe()
    }

    /// 等待总览请求完成，此时其他切片可能仍在加载
    pub async fn settled(&self) -> DashboardViewModel {
        wait_until_settled(self.subscribe()).await
    }

    /// 等待四个请求全部完成
    pub async fn finished(&mut self) -> DashboardViewModel {
        if !self.finished {
            if let Err(e) = (&mut self.task).await {
                if !e.is_cancelled() {
                    tracing::error!("Dashboard task failed: {}", e);
                }
            }
            self.finished = true;
        }
        self.snapshot()
    }

    pub fn is_attached(&self) -> bool {
        self.view.is_attached()
    }

    /// 卸载，之后到达的结果全部丢弃
    pub fn unmount(self) {}
}

impl Drop for DashboardMount {
    fn drop(&mut self) {
        self.view.detach();
        self.task.abort();
    }
}

/// 等待视图结束加载状态；通道关闭时返回最后一次的视图
pub async fn wait_until_settled(
    mut rx: watch::Receiver<DashboardViewModel>,
) -> DashboardViewModel {
    if let Ok(view) = rx.wait_for(|view| !view.loading).await {
        return view.clone();
    }
    rx.borrow().clone()
}
