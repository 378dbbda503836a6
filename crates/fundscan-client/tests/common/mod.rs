pub mod mock_info;
