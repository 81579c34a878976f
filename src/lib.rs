/// 内部导出的模块
mod internal;


/// 导出核心入口：下载器与其配置、结果、错误
pub use internal::downloader::structs::*;

/// 解析器：公开分享链接 → 可 Range 请求的直链及元数据。
///
/// 解析器是可替换的外部协作者，自定义实现只需实现 [`resolver::ResourceResolver`]。
pub mod resolver {
    use crate::internal;
    pub use internal::resolver::functions::*;
    pub use internal::resolver::structs::*;
    pub use internal::resolver::traits::*;
}

/// 任务级可观察状态：进度计数与状态机当前阶段
pub mod states {
    pub mod job_progress {
        use crate::internal;
        pub use internal::states::job_progress::*;
    }

    pub mod job_state {
        use crate::internal;
        pub use internal::states::job_state::*;
    }
}

/// 共享 HTTP 客户端的构建，外部自行组装解析器时可复用
pub mod http {
    use crate::internal;
    pub use internal::http_client::*;
}
