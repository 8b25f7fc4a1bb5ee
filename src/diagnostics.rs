//! # 诊断输出模块
//!
//! 库本身不安装任何全局日志器。调用方可以注入一个 `log::Log` 实现作为诊断接收端，
//! 未注入时所有记录被静默丢弃。诊断输出从不影响控制流或结果。

use log::{Level, Log, Metadata, Record};
use std::fmt;

/// 日志记录使用的 target。
pub const TARGET: &str = "lsb_sentinel";

/// 可选的诊断接收端。
#[derive(Clone, Copy, Default)]
pub struct Diagnostics {
    sink: Option<&'static dyn Log>,
}

impl Diagnostics {
    /// 不输出任何内容的接收端。
    pub fn silent() -> Self {
        Self { sink: None }
    }

    pub fn new(sink: &'static dyn Log) -> Self {
        Self { sink: Some(sink) }
    }

    /// 转发到 `log` 门面当前安装的全局日志器。
    ///
    /// 仅供二进制程序在初始化 `env_logger` 之后使用。
    pub fn global() -> Self {
        Self::new(log::logger())
    }

    pub fn is_silent(&self) -> bool {
        self.sink.is_none()
    }

    pub fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        let Some(sink) = self.sink else {
            return;
        };
        let metadata = Metadata::builder().level(level).target(TARGET).build();
        if !sink.enabled(&metadata) {
            return;
        }
        sink.log(
            &Record::builder()
                .metadata(metadata)
                .args(args)
                .module_path_static(Some(module_path!()))
                .build(),
        );
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Error, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Warn, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Info, args);
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Debug, args);
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("silent", &self.is_silent())
            .finish()
    }
}
