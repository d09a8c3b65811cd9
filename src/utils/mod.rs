//! # 常用接口模块
//!
//! 本模块提供一些常用的操作接口（目前只有单元测试用的断言宏）
